//! Structural graph derived from the document.
//!
//! The [`GraphStore`](store::GraphStore) tracks parent/child records per
//! box; [`build`](builder::build) derives those records from the nesting of
//! the document tree.

pub mod builder;
pub mod store;

pub use builder::build;
pub use store::{GraphRecord, GraphStore};
