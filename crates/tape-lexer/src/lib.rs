//! Tape lexer: converts source text into a run-length merged token stream.

pub mod lexer;
pub mod token_list;

pub use lexer::{lex, LexOptions, Lexer};
pub use token_list::TokenList;
