use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a single offset.
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Width of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The text of `source` surrounding `span`, widened by `radius` bytes on
/// each side.
///
/// The window is clamped to the text and to char boundaries, so it is
/// always valid UTF-8 even when the source contains multi-byte
/// comment characters.
pub fn context_window(source: &str, span: Span, radius: usize) -> &str {
    let len = source.len();
    let mut start = span.start.saturating_sub(radius).min(len);
    let mut end = span.end.saturating_add(radius).min(len).max(start);
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    while !source.is_char_boundary(end) {
        end += 1;
    }
    &source[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_point() {
        let s = Span::point(5);
        assert_eq!(s.start, 5);
        assert_eq!(s.end, 5);
        assert!(s.is_empty());
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(5, 10);
        let b = Span::new(3, 8);
        assert_eq!(a.merge(b), Span::new(3, 10));
        assert_eq!(b.merge(a), Span::new(3, 10));
    }

    #[test]
    fn test_span_merge_disjoint() {
        let a = Span::new(0, 1);
        let b = Span::new(7, 9);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(0, 9));
        assert_eq!(merged.len(), 9);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(format!("{}", Span::new(3, 7)), "3..7");
    }

    #[test]
    fn test_context_window_clamped() {
        let src = "abcdefghijklmnopqrstuvwxyz]0123456789abcdef";
        assert_eq!(context_window(src, Span::new(26, 27), 10), "qrstuvwxyz]0123456789");
        assert_eq!(context_window(src, Span::new(0, 1), 3), "abcd");
        assert_eq!(context_window(src, Span::new(42, 43), 2), "def");
    }

    #[test]
    fn test_context_window_char_boundaries() {
        // 'é' is two bytes; a radius of 1 from offset 3 would land inside it.
        assert_eq!(context_window("é]é", Span::new(2, 3), 1), "é]é");
    }

    #[test]
    fn test_span_determinism_100_iterations() {
        let a = Span::new(5, 10);
        let b = Span::new(2, 8);
        let first = a.merge(b);
        for i in 0..100 {
            assert_eq!(first, a.merge(b), "Determinism failure at iteration {i}");
        }
    }
}
