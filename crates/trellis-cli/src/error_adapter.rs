//! Error adapter for converting TrellisError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI. A parse
//! failure carries its source text and byte offset, so it renders as a
//! labeled snippet; every other variant renders as a plain coded error.

use std::error::Error;
use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use trellis::TrellisError;

/// Adapter wrapping a [`TrellisError`] for miette rendering.
pub struct ErrorAdapter<'a>(pub &'a TrellisError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // The offset renders as a label; the bare message reads better.
            TrellisError::Parse { err, .. } => write!(f, "{}", err.message()),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            TrellisError::Io(_) => "trellis::io",
            TrellisError::Parse { .. } => "trellis::parse",
            TrellisError::Graph(_) => "trellis::graph",
            TrellisError::Layout(_) => "trellis::layout",
            TrellisError::Edit(_) => "trellis::edit",
            TrellisError::Oracle(_) => "trellis::oracle",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self.0 {
            TrellisError::Parse { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self.0 {
            TrellisError::Parse { err, src } => {
                let offset = err.offset().min(src.len());
                let span = SourceSpan::new(offset.into(), 0);
                let label =
                    LabeledSpan::new_primary_with_span(Some(err.message().to_string()), span);
                Some(Box::new(std::iter::once(label)))
            }
            _ => None,
        }
    }
}
