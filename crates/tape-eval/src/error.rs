//! Runtime error types for the Tape evaluator.

use thiserror::Error;

/// Evaluation error: a budget ran out or the tree is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Step budget exhausted; most likely an infinite loop.
    #[error("gas exhausted after {0} steps")]
    GasExhausted(u64),
    /// Closure slots invoked each other too deeply.
    #[error("call depth exceeded the limit of {0}")]
    CallDepthExceeded(usize),
    /// The tree was not produced by the parser.
    #[error("malformed program: {0}")]
    Malformed(String),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
