//! Per-node Go fragments.

use tape_types::ast::{Block, Countable, Counted, Node, OpKind, Preamble};
use tape_types::TAPE_SIZE;

use crate::names::*;
use crate::writer::GoWriter;

/// A node that produces code.
pub trait Emit {
    fn emit(&self, w: &mut GoWriter);
}

impl Emit for Node {
    fn emit(&self, w: &mut GoWriter) {
        match self {
            Node::Preamble(preamble) => preamble.emit(w),
            Node::Postamble(_) => emit_postamble(w),
            Node::Counted(counted) => counted.emit(w),
            Node::Output(_) => emit_output(w),
            Node::Input(_) => emit_input(w),
            Node::FunctionExec(_) => emit_function_exec(w),
            Node::Loop(block) => emit_loop(block, w),
            Node::FunctionDef(block) => emit_function_def(block, w),
        }
    }
}

impl Emit for [Node] {
    fn emit(&self, w: &mut GoWriter) {
        for node in self {
            node.emit(w);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Frame
// ══════════════════════════════════════════════════════════════════════════════

impl Emit for Preamble {
    fn emit(&self, w: &mut GoWriter) {
        let functions = self.dialect.has_functions();

        w.line("package main");
        w.blank();
        w.line(format!("import \"{IMPORT_ALWAYS}\""));
        if self.uses_input {
            w.line(format!("import \"{IMPORT_INPUT}\""));
        }
        if self.uses_output {
            w.line(format!("import \"{IMPORT_OUTPUT}\""));
        }
        w.blank();
        w.line(format!("const {REGISTERS} = {TAPE_SIZE}"));
        w.blank();
        w.open("func main()");
        w.line(format!("{TAPE} := make([]byte, {REGISTERS})"));
        if functions {
            w.line(format!("{FUNCTIONS} := make([]func(), {REGISTERS})"));
        }
        w.line(format!("{CURSOR} := 0"));
        w.blank();
        w.line("// Suppress unused warnings");
        w.line(format!("_ = {TAPE}"));
        if functions {
            w.line(format!("_ = {FUNCTIONS}"));
        }
        w.line(format!("_ = {CURSOR}"));
        w.blank();
        w.line("// Program begin");
    }
}

fn emit_postamble(w: &mut GoWriter) {
    w.line("// Program end");
    w.line("// Flush stdout");
    w.line(format!("{IMPORT_ALWAYS}.Stdout.Sync()"));
    w.close();
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic & cursor
// ══════════════════════════════════════════════════════════════════════════════

impl Emit for Counted {
    fn emit(&self, w: &mut GoWriter) {
        // Reduced so the literal fits a byte / stays inside the tape.
        let delta = self.count() % 256;
        let steps = self.count() % TAPE_SIZE as u64;
        match self.op {
            OpKind::Increment => w.line(format!("{TAPE}[{CURSOR}] += {delta}")),
            OpKind::Decrement => w.line(format!("{TAPE}[{CURSOR}] -= {delta}")),
            OpKind::ShiftNext => {
                w.line(format!("{CURSOR} = ({CURSOR} + {steps}) % {REGISTERS}"))
            }
            OpKind::ShiftPrev => w.line(format!(
                "{CURSOR} = ({CURSOR} + {REGISTERS} - {steps}) % {REGISTERS}"
            )),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// I/O
// ══════════════════════════════════════════════════════════════════════════════

fn emit_output(w: &mut GoWriter) {
    w.line(format!(
        "{IMPORT_OUTPUT}.Print(string([]byte{{{TAPE}[{CURSOR}]}}))"
    ));
}

/// One byte from stdin. End of input stores 0; any other error aborts.
fn emit_input(w: &mut GoWriter) {
    w.open("");
    w.line("var buf [1]byte");
    w.open("if _, err := io.ReadFull(os.Stdin, buf[:]); err == nil");
    w.line(format!("{TAPE}[{CURSOR}] = buf[0]"));
    w.branch("else if err == io.EOF");
    w.line(format!("{TAPE}[{CURSOR}] = 0"));
    w.branch("else");
    w.line("os.Stderr.WriteString(\"read error: \" + err.Error() + \"\\n\")");
    w.line("os.Exit(1)");
    w.close();
    w.close();
}

// ══════════════════════════════════════════════════════════════════════════════
// Structure
// ══════════════════════════════════════════════════════════════════════════════

fn emit_loop(block: &Block, w: &mut GoWriter) {
    w.open(format!("for {TAPE}[{CURSOR}] != 0"));
    block.children.emit(w);
    w.close();
}

/// Stores the body in the slot of the register current at definition time.
fn emit_function_def(block: &Block, w: &mut GoWriter) {
    w.open(format!("{FUNCTIONS}[{CURSOR}] = func()"));
    block.children.emit(w);
    w.close();
}

fn emit_function_exec(w: &mut GoWriter) {
    w.open(format!("if {FUNCTIONS}[{CURSOR}] != nil"));
    w.line(format!("{FUNCTIONS}[{CURSOR}]()"));
    w.close();
}
