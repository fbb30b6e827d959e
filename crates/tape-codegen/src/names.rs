//! Identifiers shared by every fragment of the generated Go program.

/// Tape size constant.
pub const REGISTERS: &str = "REGISTERS";
/// The byte tape.
pub const TAPE: &str = "registers";
/// Closure slots, parallel to the tape.
pub const FUNCTIONS: &str = "functions";
/// The cursor.
pub const CURSOR: &str = "currentIndex";

/// Import that every program needs.
pub const IMPORT_ALWAYS: &str = "os";
/// Import needed by input statements.
pub const IMPORT_INPUT: &str = "io";
/// Import needed by output statements.
pub const IMPORT_OUTPUT: &str = "fmt";
