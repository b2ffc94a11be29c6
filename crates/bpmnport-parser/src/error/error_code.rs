//! Error codes for unreadable exports.
//!
//! Error codes are organized by phase:
//! - `E0xx` - JSON syntax errors
//! - `E1xx` - Document structure errors

use std::fmt;

use serde_json::error::Category;

/// Categorizes why an export could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Invalid JSON.
    ///
    /// The export is not well-formed JSON at this position.
    E001,

    /// Unexpected end of input.
    ///
    /// The export ended before the JSON document was complete, which usually
    /// means the file was truncated.
    E002,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Unexpected value type.
    ///
    /// A known field of the export holds a value of the wrong type, for
    /// example a string where bounds coordinates are expected.
    E100,
}

impl ErrorCode {
    /// Maps the JSON reader's failure category to a code.
    pub fn from_category(category: Category) -> Self {
        match category {
            Category::Eof => ErrorCode::E002,
            Category::Data => ErrorCode::E100,
            Category::Syntax | Category::Io => ErrorCode::E001,
        }
    }

    /// Returns the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
        }
    }

    /// The reading phase that failed.
    pub fn phase(&self) -> &'static str {
        match self {
            ErrorCode::E001 | ErrorCode::E002 => "syntax",
            ErrorCode::E100 => "structure",
        }
    }

    /// Short text placed under the offending character.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "invalid JSON",
            ErrorCode::E002 => "input ends here",
            ErrorCode::E100 => "unexpected value",
        }
    }

    /// Suggests what to check in the export.
    pub fn help(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "check the export for manual edits",
            ErrorCode::E002 => "the export appears to be truncated",
            ErrorCode::E100 => "a known field holds a value of the wrong type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
    }

    #[test]
    fn test_from_category() {
        assert_eq!(ErrorCode::from_category(Category::Eof), ErrorCode::E002);
        assert_eq!(ErrorCode::from_category(Category::Data), ErrorCode::E100);
        assert_eq!(ErrorCode::from_category(Category::Syntax), ErrorCode::E001);
    }

    #[test]
    fn test_phase() {
        assert_eq!(ErrorCode::E002.phase(), "syntax");
        assert_eq!(ErrorCode::E100.phase(), "structure");
    }
}
