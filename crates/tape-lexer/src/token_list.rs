//! The lexer's flat output buffer.

use tape_types::ast::{Countable, Node, Token};
use tracing::trace;

/// Flat, ordered token sequence.
///
/// Never holds two adjacent countable tokens with the same operation tag:
/// [`TokenList::push`] folds a repetition into the previous token instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `token`, merging it into the most recent token when both are
    /// countable with the same operation tag.
    ///
    /// A merge bumps the count and stretches the span to cover the new
    /// character; the incoming token is dropped.
    pub fn push(&mut self, token: Token) {
        if let (Token::Node(Node::Counted(incoming)), Some(last)) =
            (&token, self.tokens.last_mut())
        {
            if let Some(previous) = last.as_counted_mut() {
                if previous.op() == incoming.op() {
                    previous.add();
                    previous.span = previous.span.merge(incoming.span);
                    trace!(op = %previous.op, count = previous.count, "merged repetition");
                    return;
                }
            }
        }
        self.tokens.push(token);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}
