//! Location-aware report of an unreadable export.

use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// Where and why the JSON reader stopped.
///
/// The line and column are 1-based, as the JSON reader counts them; the
/// span covers the character at that position.
///
/// ```text
/// E002 at line 3, column 1: EOF while parsing a list
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    code: ErrorCode,
    message: String,
    span: Span,
    line: usize,
    column: usize,
}

impl Diagnostic {
    /// Builds a diagnostic from a failed read of `source`.
    ///
    /// # Example
    ///
    /// ```
    /// # use bpmnport_parser::error::{Diagnostic, ErrorCode};
    /// let source = "{\"childShapes\": [";
    /// let err = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
    ///
    /// let diag = Diagnostic::from_json_error(source, &err);
    /// assert_eq!(diag.code(), ErrorCode::E002);
    /// assert_eq!(diag.line(), 1);
    /// ```
    pub fn from_json_error(source: &str, err: &serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());

        // The reader appends the position to its message; it is kept separately
        let text = err.to_string();
        let suffix = format!(" at line {line} column {column}");
        let message = text
            .strip_suffix(suffix.as_str())
            .map_or_else(|| text.clone(), str::to_string);

        Self {
            code: ErrorCode::from_category(err.classify()),
            message,
            span: Span::at_line_column(source, line, column),
            line,
            column,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The reader's message without its position.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte range of the offending character.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}: {}",
            self.code, self.line, self.column, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}
