//! Parser for the Trellis markup dialect.
//!
//! The learn oracle produces subtree descriptions in a small HTML-like
//! dialect: nested elements with class attributes, for example
//! `<div class="union"><div class="box">concat</div>...</div>`. This crate
//! turns such a string into the [`Markup`](trellis_core::markup::Markup)
//! element tree the engine instantiates.
//!
//! The public entry point is [`parse_markup`].

pub mod error;
pub mod parser;

pub use error::ParseError;
pub use parser::parse_markup;
