//! Recursive-descent parser over the lexer's flat token list.
//!
//! Parsing runs in two passes:
//! 1. Fold the token list into a tree. Each `[` or `{` recurses on the
//!    remaining tokens one level deeper; the nested call stops at its
//!    closer and reports how many tokens it consumed.
//! 2. Summarise the finished tree and build the `Preamble` from it.

use tape_lexer::TokenList;
use tape_types::ast::{Block, Dialect, Marker, Node, Preamble, Program, Summary, Token};
use tape_types::{ErrorCode, Span, TapeError};
use tracing::{debug, trace};

/// Default limit on nested loops and function bodies.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of `[` and `{` scopes.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The scope a nested call is parsing: its opener and where it sits.
#[derive(Debug, Clone, Copy)]
struct Scope {
    opener: Marker,
    span: Span,
}

/// Output of one level of descent.
struct Sequence {
    nodes: Vec<Node>,
    /// Tokens consumed, including the closer that ended the sequence.
    consumed: usize,
    /// Span of that closer; `None` at the top level.
    closer: Option<Span>,
}

/// The Tape parser.
pub struct Parser {
    tokens: Vec<Token>,
    max_depth: usize,
}

impl Parser {
    /// Create a new parser from a token list.
    pub fn new(tokens: TokenList, options: ParseOptions) -> Self {
        Self {
            tokens: tokens.into_tokens(),
            max_depth: options.max_depth,
        }
    }

    /// Parse the token list into a [`Program`].
    ///
    /// Fails on the first structural problem: a closer without an open
    /// scope, a closer of the wrong kind, an opener left unclosed, or
    /// nesting deeper than the configured limit.
    pub fn parse(self) -> Result<Program, TapeError> {
        let sequence = self.parse_tokens(&self.tokens, 0, None)?;
        let mut body = sequence.nodes;

        let (span, dialect) = match body.first() {
            Some(Node::Preamble(lexed)) => {
                let frame = (lexed.span, lexed.dialect);
                body.remove(0);
                frame
            }
            _ => (Span::point(0), Dialect::default()),
        };
        if !matches!(body.last(), Some(Node::Postamble(_))) {
            body.push(Node::Postamble(Span::point(0)));
        }

        let summary = Summary::of(&body);
        let preamble = Preamble::from_summary(span, dialect, &summary);

        let mut nodes = Vec::with_capacity(body.len() + 1);
        nodes.push(Node::Preamble(preamble));
        nodes.extend(body);

        debug!(
            tokens = self.tokens.len(),
            nodes = nodes.len(),
            loops = summary.loops,
            function_defs = summary.function_defs,
            max_depth = summary.max_depth,
            uses_input = summary.uses_input,
            uses_output = summary.uses_output,
            "parsed program"
        );
        Ok(Program { nodes })
    }

    /// Parse `tokens` at nesting `depth` until `scope`'s closer, or to the
    /// end of input at the top level.
    fn parse_tokens(
        &self,
        tokens: &[Token],
        depth: usize,
        scope: Option<Scope>,
    ) -> Result<Sequence, TapeError> {
        let mut nodes = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            match &tokens[i] {
                Token::Marker(marker, span) if marker.is_opener() => {
                    let inner = self.open_scope(&tokens[i + 1..], depth, *marker, *span)?;
                    let fallback = inner.closer.map_or(*span, |closer| span.merge(closer));
                    let block = Block::new(inner.nodes, fallback);
                    nodes.push(match marker {
                        Marker::FuncOpen => Node::FunctionDef(block),
                        _ => Node::Loop(block),
                    });
                    i += inner.consumed;
                }
                Token::Marker(marker, span) => {
                    let closer = *span;
                    let Some(scope) = scope else {
                        return Err(TapeError::new(
                            ErrorCode::UNMATCHED_CLOSER,
                            format!("{} closed while not open", capitalized(*marker)),
                            closer,
                        ));
                    };
                    if scope.opener.closer() != Some(*marker) {
                        return Err(TapeError::new(
                            ErrorCode::MISMATCHED_CLOSER,
                            format!(
                                "{} closed while {} opened at {} is open",
                                capitalized(*marker),
                                scope.opener.scope_name(),
                                scope.span.start
                            ),
                            closer,
                        ));
                    }
                    trace!(depth, scope = scope.opener.scope_name(), "closed scope");
                    // +1 for the closer itself
                    return Ok(Sequence {
                        nodes,
                        consumed: i + 1,
                        closer: Some(closer),
                    });
                }
                Token::Node(node) => nodes.push(node.clone()),
            }
            i += 1;
        }

        match scope {
            Some(scope) => Err(TapeError::new(
                ErrorCode::UNCLOSED_OPENER,
                format!("{} opened but never closed", capitalized(scope.opener)),
                scope.span,
            )),
            None => Ok(Sequence {
                nodes,
                consumed: i,
                closer: None,
            }),
        }
    }

    /// Descend into the scope opened by `opener` at `span`.
    fn open_scope(
        &self,
        rest: &[Token],
        depth: usize,
        opener: Marker,
        span: Span,
    ) -> Result<Sequence, TapeError> {
        let depth = depth + 1;
        if depth > self.max_depth {
            return Err(TapeError::new(
                ErrorCode::NESTING_TOO_DEEP,
                format!(
                    "{} nested deeper than the limit of {}",
                    capitalized(opener),
                    self.max_depth
                ),
                span,
            ));
        }
        trace!(depth, scope = opener.scope_name(), at = span.start, "opened scope");
        self.parse_tokens(rest, depth, Some(Scope { opener, span }))
    }
}

/// "Loop" or "Function", for the start of a message.
fn capitalized(marker: Marker) -> &'static str {
    match marker {
        Marker::LoopOpen | Marker::LoopClose => "Loop",
        Marker::FuncOpen | Marker::FuncClose => "Function",
    }
}

/// Parse a lexed token list with the given options.
pub fn parse(tokens: TokenList, options: ParseOptions) -> Result<Program, TapeError> {
    Parser::new(tokens, options).parse()
}
