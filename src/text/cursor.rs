//! Byte ranges and selections
//!
//! Offsets are byte offsets into the document, `from` inclusive and `to`
//! exclusive, matching the ranges the syntax tree reports.

use serde::{Deserialize, Serialize};

/// A range of text from `from` (inclusive) to `to` (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub from: usize,
    pub to: usize,
}

impl TextRange {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// A collapsed range (cursor only)
    pub fn at(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    /// Check if this range is empty (from == to)
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Check if `other` lies entirely inside this range
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.from >= self.from && other.to <= self.to
    }
}

/// Editor selection: ordered list of ranges, the first one is the main one
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub ranges: Vec<TextRange>,
}

impl Selection {
    pub fn new(ranges: Vec<TextRange>) -> Self {
        Self { ranges }
    }

    /// Selection holding a single range
    pub fn single(from: usize, to: usize) -> Self {
        Self {
            ranges: vec![TextRange::new(from, to)],
        }
    }

    /// Create a collapsed selection (cursor only, no selection)
    pub fn cursor(pos: usize) -> Self {
        Self::single(pos, pos)
    }

    /// The range lookups are based on; multi-range selections are not supported
    pub fn main(&self) -> Option<TextRange> {
        self.ranges.first().copied()
    }
}

/// Slice `text` by a byte range, returning "" for ranges that are out of
/// bounds or fall inside a UTF-8 sequence
pub fn slice(text: &str, range: TextRange) -> &str {
    text.get(range.from..range.to).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_range() {
        let outer = TextRange::new(2, 10);
        assert!(outer.contains_range(TextRange::new(2, 10)));
        assert!(outer.contains_range(TextRange::new(4, 6)));
        assert!(!outer.contains_range(TextRange::new(1, 6)));
    }

    #[test]
    fn test_selection_main_range() {
        let sel = Selection::new(vec![TextRange::new(3, 4), TextRange::new(8, 9)]);
        assert_eq!(sel.main(), Some(TextRange::new(3, 4)));
        assert_eq!(Selection::default().main(), None);
        assert_eq!(Selection::cursor(7).main(), Some(TextRange::at(7)));
    }

    #[test]
    fn test_slice_is_lenient() {
        let text = "K:C\n| A |";
        assert_eq!(slice(text, TextRange::new(0, 3)), "K:C");
        assert_eq!(slice(text, TextRange::new(4, 100)), "");
        assert_eq!(slice("é", TextRange::new(1, 2)), "");
    }
}
