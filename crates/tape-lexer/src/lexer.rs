//! Core Tape lexer: converts source text to a [`TokenList`].
//!
//! Features:
//! - One token per recognised command character, spanning its bytes
//! - Run-length merging of `+ - < >` repetitions (see [`TokenList::push`])
//! - Every other character is a comment and produces nothing
//! - Output is framed by a `Preamble` and a `Postamble`, both at `0..0`
//!
//! The lexer cannot fail.

use tape_types::ast::{Counted, Dialect, Marker, Node, OpKind, Preamble, Token};
use tape_types::Span;
use tracing::debug;

use crate::token_list::TokenList;

/// Lexer configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    pub dialect: Dialect,
}

/// The Tape lexer.
pub struct Lexer<'src> {
    source: &'src str,
    dialect: Dialect,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str, options: LexOptions) -> Self {
        Self {
            source,
            dialect: options.dialect,
        }
    }

    /// Lex the entire source into a token list.
    pub fn lex(self) -> TokenList {
        let mut tokens = TokenList::new();
        tokens.push(Token::Node(Node::Preamble(Preamble::new(
            Span::point(0),
            self.dialect,
        ))));

        for (offset, ch) in self.source.char_indices() {
            let span = Span::new(offset, offset + ch.len_utf8());
            if let Some(token) = self.classify(ch, span) {
                tokens.push(token);
            }
        }

        tokens.push(Token::Node(Node::Postamble(Span::point(0))));

        debug!(
            bytes = self.source.len(),
            tokens = tokens.tokens().len(),
            dialect = ?self.dialect,
            "lexed source"
        );
        tokens
    }

    /// Map one source character to its token, or `None` for comments.
    fn classify(&self, ch: char, span: Span) -> Option<Token> {
        if let Some(op) = OpKind::from_char(ch) {
            return Some(Token::Node(Node::Counted(Counted::new(op, span))));
        }

        let functions = self.dialect.has_functions();
        let token = match ch {
            '[' => Token::Marker(Marker::LoopOpen, span),
            ']' => Token::Marker(Marker::LoopClose, span),
            '{' if functions => Token::Marker(Marker::FuncOpen, span),
            '}' if functions => Token::Marker(Marker::FuncClose, span),
            '!' if functions => Token::Node(Node::FunctionExec(span)),
            '.' => Token::Node(Node::Output(span)),
            ',' => Token::Node(Node::Input(span)),
            _ => return None,
        };
        Some(token)
    }
}

/// Lex `source` with the given options.
pub fn lex(source: &str, options: LexOptions) -> TokenList {
    Lexer::new(source, options).lex()
}
