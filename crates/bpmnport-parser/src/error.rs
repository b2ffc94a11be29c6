//! Errors for unreadable exports.
//!
//! Problems with individual shapes are not errors: they are logged and the
//! shape is skipped. Only an export that cannot be deserialized fails, and
//! the failure is described by a single [`Diagnostic`] carrying an
//! [`ErrorCode`], the reader's message, and the position in the source text.
//! Diagnostics are wrapped in [`ParseError`] for returning from
//! [`crate::parse`].

mod diagnostic;
mod error_code;
mod parse_error;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
