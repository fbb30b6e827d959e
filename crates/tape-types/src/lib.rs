//! Shared types for the Tape compiler.
//!
//! This crate defines the node model (tokens and AST nodes), source spans,
//! error types, and the dialect switch used across all compiler stages.

mod error;
mod span;
pub mod ast;

pub use error::{CompileErrors, ErrorCode, TapeError, MAX_ERRORS};
pub use span::{context_window, Span};

/// Number of byte registers on the tape of every generated program.
pub const TAPE_SIZE: usize = 100;

/// Result type used throughout the Tape compiler.
pub type Result<T> = std::result::Result<T, TapeError>;
