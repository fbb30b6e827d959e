//! Tape code generator: compiles a parsed AST to Go source text.
//!
//! # Architecture
//!
//! The encoder walks a [`tape_types::ast::Program`] depth-first and emits
//! one indented fragment per node. The generated program is a single
//! `main` function that simulates the tape machine:
//!
//! ## Declarations
//! - `REGISTERS`: tape size constant (100)
//! - `registers`: the byte tape
//! - `functions`: closure slots, one per register (extended dialect only)
//! - `currentIndex`: the cursor
//!
//! ## Imports
//! - `os` always (stdin reads, exit, the final stdout sync)
//! - `io` only when the program reads input
//! - `fmt` only when the program writes output
//!
//! ## Semantics
//! Byte arithmetic wraps. The cursor wraps around the tape in both
//! directions. Loop conditions re-read the live cursor on every test.
//! Reading past end of input stores 0.

pub mod emit;
pub mod encoder;
pub mod names;
pub mod writer;

pub use emit::Emit;
pub use encoder::{encode, encode_with, CodegenOptions};
pub use writer::GoWriter;
