//! The learn oracle interface.
//!
//! Expanding an unlearned leaf asks an external collaborator for replacement
//! markup. The engine only needs the resolved string; where the markup comes
//! from (a synthesis backend, a file on disk, a test fixture) is the
//! implementor's business.

use std::io;

use thiserror::Error;

/// Errors an oracle can surface to the edit operation that invoked it.
///
/// A failing oracle is a recoverable condition: the replace operation
/// returns the error with all prior state untouched.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle rejected goal {goal:?}: {reason}")]
    Rejected { goal: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl OracleError {
    /// Creates a rejection error for the given goal.
    pub fn rejected(goal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            goal: goal.into(),
            reason: reason.into(),
        }
    }
}

/// An external collaborator that expands a goal into replacement markup.
///
/// `learn` returns one root grouping element (or a single box) of markup
/// with arbitrarily nested structure; `depth` bounds how far the oracle
/// should expand before emitting `unlearned` leaves.
pub trait LearnOracle {
    fn learn(&self, goal: &str, depth: usize) -> Result<String, OracleError>;
}

/// A fixed-response oracle, convenient for tests and demos.
#[derive(Debug, Clone)]
pub struct StaticOracle {
    markup: String,
}

impl StaticOracle {
    /// Creates an oracle that answers every goal with the same markup.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }
}

impl LearnOracle for StaticOracle {
    fn learn(&self, _goal: &str, _depth: usize) -> Result<String, OracleError> {
        Ok(self.markup.clone())
    }
}
