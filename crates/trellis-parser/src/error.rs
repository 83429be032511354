//! Error type for markup parsing.

use thiserror::Error;

/// A parse failure with the byte offset where the parser gave up.
///
/// The offset is into the source string handed to
/// [`parse_markup`](crate::parse_markup); [`ParseError::line_col`] converts
/// it to a one-based line and column for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    offset: usize,
    message: String,
}

impl ParseError {
    /// Creates a parse error at the given byte offset.
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Returns the byte offset into the source where parsing failed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the failure description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Converts the byte offset to a one-based (line, column) pair against
    /// the original source.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let upto = &source[..self.offset.min(source.len())];
        let line = upto.matches('\n').count() + 1;
        let column = upto.rfind('\n').map_or(upto.len(), |i| upto.len() - i - 1) + 1;
        (line, column)
    }
}
