//! Tape tree-walking evaluator: reference implementation.
//!
//! Executes a parsed program directly, without generating Go. The emitted
//! Go program is expected to behave exactly like this evaluator for the
//! same input bytes.

mod error;
mod machine;

pub use error::{EvalError, EvalResult};
pub use machine::{run, EvalOptions, Machine, Outcome, DEFAULT_GAS_LIMIT, DEFAULT_MAX_CALL_DEPTH};
