//! Tape compiler: orchestrates the full compilation pipeline.
//!
//! ```text
//! Tape Source → Lexer (run-length merge) → Parser (nested tree) → Encoder → Go source
//! ```
//!
//! Each stage lives in its own crate; this one wires them together
//! behind [`CompileOptions`] and exposes a JSON-friendly
//! [`CompileResult`] for tooling. The `tapec` binary is a thin shell
//! over these functions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use tape_codegen::CodegenOptions;
use tape_lexer::LexOptions;
use tape_parser::{ParseOptions, DEFAULT_MAX_DEPTH};
use tape_types::ast::{Dialect, Program};
use tape_types::{CompileErrors, TapeError};

pub use tape_types::context_window;

/// Bytes of source shown on each side of a faulty span.
pub const CONTEXT_RADIUS: usize = 10;

/// Options for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub dialect: Dialect,
    /// Deepest allowed nesting of loops and function bodies.
    pub max_depth: usize,
    /// One level of indentation in the generated Go.
    pub indent: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            indent: CodegenOptions::default().indent,
        }
    }
}

impl CompileOptions {
    fn lex(&self) -> LexOptions {
        LexOptions {
            dialect: self.dialect,
        }
    }

    fn parse(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
        }
    }

    fn codegen(&self) -> CodegenOptions {
        CodegenOptions {
            indent: self.indent.clone(),
        }
    }
}

/// The structured JSON output for a compilation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    /// Name of the compiled source, as given by the caller.
    pub filename: String,
    /// Whether compilation succeeded.
    pub success: bool,
    /// Generated Go source (if successful).
    pub output: Option<String>,
    /// Errors reported by the parser.
    pub errors: CompileErrors,
    /// SHA-256 hex digest of the generated source (if successful).
    pub source_hash: Option<String>,
}

/// Lex and parse `source` into a tree.
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse(source: &str, options: &CompileOptions) -> Result<Program, TapeError> {
    let tokens = tape_lexer::lex(source, options.lex());
    tape_parser::parse(tokens, options.parse())
}

/// Compile `source` to Go source text.
#[tracing::instrument(level = "debug", skip_all)]
pub fn compile(source: &str, options: &CompileOptions) -> Result<String, TapeError> {
    let program = parse(source, options)?;
    Ok(tape_codegen::encode_with(&program, &options.codegen()))
}

/// Compile `source` and package the outcome for tooling.
#[tracing::instrument(level = "debug", skip(source, options))]
pub fn compile_to_result(source: &str, filename: &str, options: &CompileOptions) -> CompileResult {
    match compile(source, options) {
        Ok(output) => {
            let source_hash = hex_digest(&output);
            debug!(%source_hash, bytes = output.len(), "compiled");
            CompileResult {
                filename: filename.to_string(),
                success: true,
                output: Some(output),
                errors: CompileErrors::empty(),
                source_hash: Some(source_hash),
            }
        }
        Err(error) => {
            debug!(code = %error.code, "compilation failed");
            CompileResult {
                filename: filename.to_string(),
                success: false,
                output: None,
                errors: CompileErrors::from(error),
                source_hash: None,
            }
        }
    }
}

fn hex_digest(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
