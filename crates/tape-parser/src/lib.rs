//! Tape parser: converts a token stream into a nested AST.

mod parser;

pub use parser::{parse, ParseOptions, Parser, DEFAULT_MAX_DEPTH};
