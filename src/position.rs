//! Conversion between tree coordinates and absolute text offsets
//!
//! The syntax tree reports `(row, column)` points while the line-oriented
//! checks and the template inserter work with byte offsets into the source.
//! [`LineIndex`] precomputes line starts once per pass so both directions are
//! cheap. Columns are byte columns, matching what tree-sitter reports.
//!
//! Out-of-range coordinates never panic: rows past the end map to the end of
//! the text and offsets past the end are clamped to the last position.

use serde::{Deserialize, Serialize};

/// A zero-based line/column point in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-based)
    pub line: usize,
    /// Byte column within the line (0-based)
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A half-open span between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span on a single line from `start` to `end` columns
    pub fn on_line(line: usize, start: usize, end: usize) -> Self {
        Self {
            start: Position::new(line, start),
            end: Position::new(line, end),
        }
    }

    /// Number of columns covered when the range stays on one line
    pub fn len(&self) -> usize {
        if self.start.line == self.end.line {
            self.end.character.saturating_sub(self.start.character)
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Precomputed line starts for one version of a text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines; a trailing newline opens one more (empty) line
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offset where `row` begins
    pub fn line_start(&self, row: usize) -> Option<usize> {
        self.line_starts.get(row).copied()
    }

    /// Absolute offset of `(row, column)`, clamped to the text length
    pub fn offset_of(&self, row: usize, column: usize) -> usize {
        match self.line_starts.get(row) {
            Some(start) => start.saturating_add(column).min(self.len),
            None => self.len,
        }
    }

    /// Offset of a [`Position`]
    pub fn offset_at(&self, position: Position) -> usize {
        self.offset_of(position.line, position.character)
    }

    /// Position of an absolute offset, clamped to the end of the text
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Position::new(line, offset - self.line_starts[line])
    }

    /// Range covering `start..end` offsets
    pub fn range_of(&self, start: usize, end: usize) -> Range {
        Range::new(self.position_of(start), self.position_of(end))
    }
}

/// One-shot `offsetOf` for callers without an index
pub fn offset_of(text: &str, row: usize, column: usize) -> usize {
    LineIndex::new(text).offset_of(row, column)
}

/// One-shot `positionOf` for callers without an index
pub fn position_of(text: &str, offset: usize) -> Position {
    LineIndex::new(text).position_of(offset)
}

/// Number of UTF-16 code units before byte column `column` of `line`
///
/// Columns past the end of the line keep their distance from it.
pub fn utf16_column(line: &str, column: usize) -> usize {
    if column >= line.len() {
        return line.encode_utf16().count() + (column - line.len());
    }
    line.char_indices()
        .take_while(|(i, _)| *i < column)
        .map(|(_, c)| c.len_utf16())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_column() {
        assert_eq!(utf16_column("int* p;", 4), 4);
        assert_eq!(utf16_column("/* é */ int* p;", 9), 8);
        assert_eq!(utf16_column("/* 😀 */ x", 9), 7);
        assert_eq!(utf16_column("é", 5), 4);
    }

    #[test]
    fn test_offset_of_first_line() {
        assert_eq!(offset_of("int x;\nint y;", 0, 4), 4);
    }

    #[test]
    fn test_offset_of_counts_newlines() {
        let text = "ab\ncde\nf";
        assert_eq!(offset_of(text, 1, 0), 3);
        assert_eq!(offset_of(text, 1, 2), 5);
        assert_eq!(offset_of(text, 2, 0), 7);
    }

    #[test]
    fn test_final_line_without_newline() {
        let text = "a\nbc";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.offset_of(1, 2), 4);
        assert_eq!(index.position_of(4), Position::new(1, 2));
    }

    #[test]
    fn test_trailing_newline_opens_empty_line() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_start(1), Some(2));
        assert_eq!(index.position_of(2), Position::new(1, 0));
    }

    #[test]
    fn test_round_trip_every_offset() {
        let text = "void f(void)\n{\n        return;\n}\n";
        let index = LineIndex::new(text);
        for offset in 0..=text.len() {
            let pos = index.position_of(offset);
            assert_eq!(index.offset_at(pos), offset);
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let text = "abc\ndef";
        let index = LineIndex::new(text);
        assert_eq!(index.offset_of(10, 0), text.len());
        assert_eq!(index.offset_of(0, 100), text.len());
        assert_eq!(index.position_of(1000), Position::new(1, 3));
    }

    #[test]
    fn test_empty_text() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.offset_of(0, 0), 0);
        assert_eq!(index.position_of(0), Position::new(0, 0));
    }

    #[test]
    fn test_range_len() {
        assert_eq!(Range::on_line(3, 4, 9).len(), 5);
        assert!(Range::on_line(0, 2, 2).is_empty());
        let multi = Range::new(Position::new(0, 5), Position::new(2, 1));
        assert_eq!(multi.len(), 0);
    }

    #[test]
    fn test_range_of_offsets() {
        let index = LineIndex::new("int x;\nint y;\n");
        let range = index.range_of(11, 12);
        assert_eq!(range, Range::on_line(1, 4, 5));
    }
}
