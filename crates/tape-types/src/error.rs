use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of errors kept in a [`CompileErrors`] collection.
pub const MAX_ERRORS: usize = 20;

/// Numeric error code (E100–E199, all structural).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    /// `]` or `}` with no open scope at all.
    pub const UNMATCHED_CLOSER: Self = Self(100);
    /// `]` closing a function body, or `}` closing a loop.
    pub const MISMATCHED_CLOSER: Self = Self(101);
    /// `[` or `{` still open at end of input.
    pub const UNCLOSED_OPENER: Self = Self(102);
    /// Scopes nested beyond the configured maximum depth.
    pub const NESTING_TOO_DEEP: Self = Self(103);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured Tape compiler error.
///
/// Carries the span of the offending marker so the driver can print the
/// surrounding source without re-parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeError {
    /// Error code (e.g., E100).
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Byte span of the faulty marker.
    pub span: Span,
}

impl TapeError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error: {}, Position: {} - {}",
            self.message, self.span.start, self.span.end
        )
    }
}

impl std::error::Error for TapeError {}

/// Errors collected for a JSON compile result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<TapeError>,
    pub total_errors: usize,
}

impl CompileErrors {
    /// Create an empty result (no errors).
    pub fn empty() -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
        }
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the MAX_ERRORS limit.
    pub fn push_error(&mut self, error: TapeError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }
}

impl From<TapeError> for CompileErrors {
    fn from(error: TapeError) -> Self {
        let mut errors = Self::empty();
        errors.push_error(error);
        errors
    }
}
