//! Encoder entry points.

use tape_types::ast::Program;
use tracing::debug;

use crate::emit::Emit;
use crate::writer::GoWriter;

/// Code generator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// One level of indentation in the generated source.
    pub indent: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
        }
    }
}

/// Encode a parsed [`Program`] as Go source with default options.
///
/// Total over every tree the parser accepts.
pub fn encode(program: &Program) -> String {
    encode_with(program, &CodegenOptions::default())
}

/// Encode a parsed [`Program`] as Go source.
#[tracing::instrument(level = "debug", skip_all)]
pub fn encode_with(program: &Program, options: &CodegenOptions) -> String {
    let mut w = GoWriter::new(options.indent.as_str());
    program.nodes.emit(&mut w);
    let code = w.finish();
    debug!(
        nodes = program.nodes.len(),
        bytes = code.len(),
        lines = code.lines().count(),
        "encoded program"
    );
    code
}
