//! Error types for Trellis operations.
//!
//! This module provides the main error type [`TrellisError`] which wraps the
//! error conditions that can occur while loading, editing, or exporting a
//! visualization.

use std::io;

use thiserror::Error;

use trellis_parser::ParseError;

use crate::oracle::OracleError;

/// The main error type for Trellis operations.
///
/// The `Parse` variant carries the original source alongside the structured
/// parse error so callers can render the failure position against the text
/// that produced it.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Edit error: {0}")]
    Edit(String),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

impl TrellisError {
    /// Create a new `Parse` error with the associated markup source.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
