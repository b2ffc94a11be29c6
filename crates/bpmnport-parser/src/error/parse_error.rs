//! The ParseError type returned by [`crate::parse`].

use std::fmt;

use crate::error::Diagnostic;

/// Error returned when an export document cannot be read.
///
/// The JSON reader stops at the first problem, so there is exactly one
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    diagnostic: Diagnostic,
}

impl ParseError {
    /// Get the diagnostic describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unreadable export: {}", self.diagnostic)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.diagnostic)
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }
}
