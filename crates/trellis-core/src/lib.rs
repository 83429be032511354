//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types for the Trellis visualization
//! engine. It includes:
//!
//! - **Identifiers**: Opaque handles for document nodes and edges ([`identifier`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Markup**: The element tree produced by the markup parser and the
//!   node-kind classification the graph builder depends on ([`markup`] module)
//! - **Measure**: Deterministic text measurement for node sizing ([`measure`])

pub mod geometry;
pub mod identifier;
pub mod markup;
pub mod measure;
