//! Error types for bpmnport operations.
//!
//! This module provides the main error type [`BpmnPortError`] which wraps
//! the failures that can stop a conversion. Problems with individual shapes
//! or flows never surface here; they are logged and skipped.

use std::io;

use thiserror::Error;

use bpmnport_parser::error::ParseError;

/// The main error type for bpmnport operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the export text next to the diagnostic, so
/// callers can render a labelled source snippet.
#[derive(Debug, Error)]
pub enum BpmnPortError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for BpmnPortError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl BpmnPortError {
    /// Create a new `Parse` error with the associated export text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
