//! The tape machine.

use tape_types::ast::{Counted, Dialect, Node, OpKind, Program};
use tape_types::TAPE_SIZE;
use tracing::{debug, trace};

use crate::error::{EvalError, EvalResult};

/// Default step budget.
pub const DEFAULT_GAS_LIMIT: u64 = 10_000_000;
/// Default limit on nested closure invocations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Evaluator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalOptions {
    /// Steps allowed before [`EvalError::GasExhausted`].
    pub gas_limit: u64,
    /// Nested `!` invocations allowed before [`EvalError::CallDepthExceeded`].
    pub max_call_depth: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Final state of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Bytes written by `.`.
    pub output: Vec<u8>,
    pub tape: Vec<u8>,
    pub cursor: usize,
    /// Gas consumed.
    pub steps: u64,
}

impl Outcome {
    /// Output decoded lossily as UTF-8.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Why a frame's node sequence is being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Top,
    /// Re-tests the current cell when the body finishes.
    Loop,
    /// Releases one unit of call depth when the body finishes.
    Call,
}

/// A node sequence in progress.
struct Frame<'p> {
    nodes: &'p [Node],
    next: usize,
    kind: FrameKind,
}

impl<'p> Frame<'p> {
    fn new(nodes: &'p [Node], kind: FrameKind) -> Self {
        Self {
            nodes,
            next: 0,
            kind,
        }
    }
}

/// Interpreter state for one run over a borrowed program.
pub struct Machine<'p> {
    tape: [u8; TAPE_SIZE],
    cursor: usize,
    /// Closure slots: the body most recently defined at each register.
    functions: Vec<Option<&'p [Node]>>,
    input: Vec<u8>,
    input_pos: usize,
    output: Vec<u8>,
    dialect: Dialect,
    gas: u64,
    gas_limit: u64,
    call_depth: usize,
    max_call_depth: usize,
}

impl<'p> Machine<'p> {
    /// Create a machine that reads its `,` bytes from `input`.
    pub fn new(input: impl Into<Vec<u8>>, options: EvalOptions) -> Self {
        Self {
            tape: [0; TAPE_SIZE],
            cursor: 0,
            functions: vec![None; TAPE_SIZE],
            input: input.into(),
            input_pos: 0,
            output: Vec::new(),
            dialect: Dialect::default(),
            gas: 0,
            gas_limit: options.gas_limit,
            call_depth: 0,
            max_call_depth: options.max_call_depth,
        }
    }

    /// Run `program` to completion.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self, program: &'p Program) -> EvalResult<Outcome> {
        self.exec(&program.nodes)?;
        debug!(
            steps = self.gas,
            output = self.output.len(),
            cursor = self.cursor,
            "program finished"
        );
        Ok(Outcome {
            output: self.output,
            tape: self.tape.to_vec(),
            cursor: self.cursor,
            steps: self.gas,
        })
    }

    /// Consume one unit of gas. Returns error if exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(EvalError::GasExhausted(self.gas_limit))
        } else {
            Ok(())
        }
    }

    /// Execute `nodes` on an explicit frame stack.
    ///
    /// Loop bodies and function calls push frames instead of recursing, so
    /// nesting depth never reaches the native stack. Only calls are
    /// bounded, by `max_call_depth`.
    fn exec(&mut self, nodes: &'p [Node]) -> EvalResult<()> {
        let mut frames = vec![Frame::new(nodes, FrameKind::Top)];

        while let Some(frame) = frames.last_mut() {
            let body = frame.nodes;
            let Some(node) = body.get(frame.next) else {
                match frame.kind {
                    FrameKind::Loop => {
                        // The live cursor is re-read on every test.
                        self.tick()?;
                        if self.tape[self.cursor] != 0 {
                            frame.next = 0;
                        } else {
                            frames.pop();
                        }
                    }
                    FrameKind::Call => {
                        self.call_depth -= 1;
                        frames.pop();
                    }
                    FrameKind::Top => {
                        frames.pop();
                    }
                }
                continue;
            };
            frame.next += 1;

            self.tick()?;
            match node {
                Node::Preamble(preamble) => self.dialect = preamble.dialect,
                Node::Postamble(_) => {}
                Node::Counted(counted) => self.apply(counted),
                Node::Output(_) => self.output.push(self.tape[self.cursor]),
                Node::Input(_) => self.read(),
                Node::Loop(block) => {
                    self.tick()?;
                    if self.tape[self.cursor] != 0 {
                        frames.push(Frame::new(&block.children, FrameKind::Loop));
                    }
                }
                Node::FunctionDef(block) => {
                    self.require_functions()?;
                    trace!(slot = self.cursor, "defined function");
                    self.functions[self.cursor] = Some(block.children.as_slice());
                }
                Node::FunctionExec(_) => {
                    self.require_functions()?;
                    if let Some(body) = self.functions[self.cursor] {
                        self.enter_call()?;
                        frames.push(Frame::new(body, FrameKind::Call));
                    }
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, counted: &Counted) {
        let delta = (counted.count % 256) as u8;
        let steps = (counted.count % TAPE_SIZE as u64) as usize;
        let cell = &mut self.tape[self.cursor];
        match counted.op {
            OpKind::Increment => *cell = cell.wrapping_add(delta),
            OpKind::Decrement => *cell = cell.wrapping_sub(delta),
            OpKind::ShiftNext => self.cursor = (self.cursor + steps) % TAPE_SIZE,
            OpKind::ShiftPrev => self.cursor = (self.cursor + TAPE_SIZE - steps) % TAPE_SIZE,
        }
    }

    /// End of input stores 0.
    fn read(&mut self) {
        let byte = self.input.get(self.input_pos).copied().unwrap_or(0);
        self.input_pos = (self.input_pos + 1).min(self.input.len());
        self.tape[self.cursor] = byte;
    }

    fn enter_call(&mut self) -> EvalResult<()> {
        if self.call_depth >= self.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.max_call_depth));
        }
        self.call_depth += 1;
        trace!(slot = self.cursor, depth = self.call_depth, "calling function");
        Ok(())
    }

    fn require_functions(&self) -> EvalResult<()> {
        if self.dialect.has_functions() {
            Ok(())
        } else {
            Err(EvalError::Malformed(
                "closure slots used in a classic-dialect program".to_string(),
            ))
        }
    }
}

/// Run `program` with default options, feeding it `input`.
pub fn run(program: &Program, input: &[u8]) -> EvalResult<Outcome> {
    Machine::new(input, EvalOptions::default()).run(program)
}
