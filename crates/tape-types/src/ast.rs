//! Node model for Tape programs.
//!
//! Every node carries a [`Span`] into the source text that produced it.
//! The lexer produces [`Token`]s; the parser folds them into a tree of
//! [`Node`]s. Bracket and brace markers exist only as tokens, so they can
//! never appear in a parsed [`Program`].

use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Capabilities
// ══════════════════════════════════════════════════════════════════════════════

/// Anything that knows which part of the source produced it.
pub trait Positional {
    fn span(&self) -> Span;

    /// Offset of the first byte of the node.
    fn start(&self) -> usize {
        self.span().start
    }

    /// Offset one past the last byte of the node.
    fn end(&self) -> usize {
        self.span().end
    }
}

/// A leaf that accumulates repetitions of the same operation.
pub trait Countable: Positional {
    fn op(&self) -> OpKind;
    fn count(&self) -> u64;
    /// Record one more repetition.
    fn add(&mut self);
}

// ══════════════════════════════════════════════════════════════════════════════
// Dialect
// ══════════════════════════════════════════════════════════════════════════════

/// Which command set the source is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// The eight tape commands: `+ - < > [ ] . ,`
    Classic,
    /// Classic plus closure slots: `{ }` defines, `!` invokes.
    #[default]
    Extended,
}

impl Dialect {
    pub fn has_functions(self) -> bool {
        matches!(self, Self::Extended)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Leaves
// ══════════════════════════════════════════════════════════════════════════════

/// Operation tag of a countable leaf. Run-length merging compares these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `<`
    ShiftPrev,
    /// `>`
    ShiftNext,
}

impl OpKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Increment),
            '-' => Some(Self::Decrement),
            '<' => Some(Self::ShiftPrev),
            '>' => Some(Self::ShiftNext),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Increment => '+',
            Self::Decrement => '-',
            Self::ShiftPrev => '<',
            Self::ShiftNext => '>',
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// `+`, `-`, `<` or `>` repeated `count` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counted {
    pub op: OpKind,
    pub count: u64,
    pub span: Span,
}

impl Counted {
    /// A single occurrence of `op`.
    pub fn new(op: OpKind, span: Span) -> Self {
        Self { op, count: 1, span }
    }

    pub fn with_count(op: OpKind, count: u64, span: Span) -> Self {
        Self { op, count, span }
    }
}

impl Positional for Counted {
    fn span(&self) -> Span {
        self.span
    }
}

impl Countable for Counted {
    fn op(&self) -> OpKind {
        self.op
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn add(&mut self) {
        self.count += 1;
    }
}

/// Program header. Always the first node of a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub span: Span,
    pub dialect: Dialect,
    /// The program reads input somewhere (`,`).
    pub uses_input: bool,
    /// The program writes output somewhere (`.`).
    pub uses_output: bool,
}

impl Preamble {
    /// A header with both capability flags cleared.
    pub fn new(span: Span, dialect: Dialect) -> Self {
        Self {
            span,
            dialect,
            uses_input: false,
            uses_output: false,
        }
    }

    /// A header whose capability flags reflect `summary`.
    pub fn from_summary(span: Span, dialect: Dialect, summary: &Summary) -> Self {
        Self {
            span,
            dialect,
            uses_input: summary.uses_input,
            uses_output: summary.uses_output,
        }
    }
}

impl Positional for Preamble {
    fn span(&self) -> Span {
        self.span
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Markers & tokens
// ══════════════════════════════════════════════════════════════════════════════

/// Scope delimiters. Consumed by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// `[`
    LoopOpen,
    /// `]`
    LoopClose,
    /// `{`
    FuncOpen,
    /// `}`
    FuncClose,
}

impl Marker {
    pub fn is_opener(self) -> bool {
        matches!(self, Self::LoopOpen | Self::FuncOpen)
    }

    /// The closer that ends a scope opened by `self`.
    pub fn closer(self) -> Option<Marker> {
        match self {
            Self::LoopOpen => Some(Self::LoopClose),
            Self::FuncOpen => Some(Self::FuncClose),
            Self::LoopClose | Self::FuncClose => None,
        }
    }

    /// What kind of scope the marker delimits, for messages.
    pub fn scope_name(self) -> &'static str {
        match self {
            Self::LoopOpen | Self::LoopClose => "loop",
            Self::FuncOpen | Self::FuncClose => "function",
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::LoopOpen => '[',
            Self::LoopClose => ']',
            Self::FuncOpen => '{',
            Self::FuncClose => '}',
        }
    }
}

/// One element of the lexer's flat output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Node(Node),
    Marker(Marker, Span),
}

impl Token {
    pub fn as_counted_mut(&mut self) -> Option<&mut Counted> {
        match self {
            Self::Node(Node::Counted(counted)) => Some(counted),
            _ => None,
        }
    }
}

impl Positional for Token {
    fn span(&self) -> Span {
        match self {
            Self::Node(node) => node.span(),
            Self::Marker(_, span) => *span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => write!(f, "{node}"),
            Self::Marker(marker, _) => write!(f, "{}", marker.symbol()),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tree
// ══════════════════════════════════════════════════════════════════════════════

/// Children of a loop or function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub children: Vec<Node>,
    pub span: Span,
}

impl Block {
    /// Wrap `children`; the span covers them, or `fallback` when empty.
    pub fn new(children: Vec<Node>, fallback: Span) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.start(), last.end()),
            _ => fallback,
        };
        Self { children, span }
    }
}

impl Positional for Block {
    fn span(&self) -> Span {
        self.span
    }
}

/// A node of the parsed tree. Every kind produces code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Preamble(Preamble),
    Postamble(Span),
    Counted(Counted),
    /// `.`
    Output(Span),
    /// `,`
    Input(Span),
    /// `!`
    FunctionExec(Span),
    /// `[ ... ]`
    Loop(Block),
    /// `{ ... }`
    FunctionDef(Block),
}

impl Node {
    /// Children of a structural container; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Loop(block) | Self::FunctionDef(block) => &block.children,
            _ => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Loop(_) | Self::FunctionDef(_))
    }
}

impl Positional for Node {
    fn span(&self) -> Span {
        match self {
            Self::Preamble(preamble) => preamble.span,
            Self::Counted(counted) => counted.span,
            Self::Loop(block) | Self::FunctionDef(block) => block.span,
            Self::Postamble(span)
            | Self::Output(span)
            | Self::Input(span)
            | Self::FunctionExec(span) => *span,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preamble(_) => write!(f, "preamble"),
            Self::Postamble(_) => write!(f, "postamble"),
            Self::Counted(c) => write!(f, "{}x{}", c.op, c.count),
            Self::Output(_) => write!(f, "."),
            Self::Input(_) => write!(f, ","),
            Self::FunctionExec(_) => write!(f, "!"),
            Self::Loop(block) => write!(f, "[{} nodes]", block.children.len()),
            Self::FunctionDef(block) => write!(f, "{{{} nodes}}", block.children.len()),
        }
    }
}

/// A parsed program: `Preamble`, the translated body, `Postamble`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub nodes: Vec<Node>,
}

/// Depth-first iterator over a node sequence and everything nested in it.
///
/// Yields each node with its nesting depth: 0 for the sequence itself,
/// one more for each enclosing loop or function body.
pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Walk<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let depth = self.stack.len().checked_sub(1)?;
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) => {
                    if node.is_container() {
                        self.stack.push(node.children().iter());
                    }
                    return Some((depth, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Summary
// ══════════════════════════════════════════════════════════════════════════════

/// Facts about a whole tree, gathered after parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub uses_input: bool,
    pub uses_output: bool,
    pub loops: usize,
    pub function_defs: usize,
    /// Deepest nesting of loops and function definitions.
    pub max_depth: usize,
}

impl Summary {
    pub fn of(nodes: &[Node]) -> Self {
        let mut summary = Self::default();
        for (depth, node) in Walk::new(nodes) {
            match node {
                Node::Input(_) => summary.uses_input = true,
                Node::Output(_) => summary.uses_output = true,
                Node::Loop(_) => summary.loops += 1,
                Node::FunctionDef(_) => summary.function_defs += 1,
                _ => {}
            }
            if node.is_container() {
                summary.max_depth = summary.max_depth.max(depth + 1);
            }
        }
        summary
    }
}
