use crate::{OffsetRange, Position, Range};

/// Maps byte offsets to 0-based line/column positions and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Create a new line index from source text
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];

        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Convert a byte offset to a line/column position (0-based)
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));

        let col = offset - self.line_starts[line];
        (line, col)
    }

    /// Convert a byte offset to a [`Position`].
    #[must_use]
    pub fn position(&self, offset: usize) -> Position {
        let (line, col) = self.line_col(offset);
        Position::new(line as u32, col as u32)
    }

    /// Convert an [`OffsetRange`] to a [`Range`].
    #[must_use]
    pub fn range(&self, range: OffsetRange) -> Range {
        Range::new(self.position(range.start), self.position(range.end))
    }

    /// Convert a [`Position`] back to a byte offset.
    ///
    /// Columns past the end of the line clamp to the line end.
    #[must_use]
    pub fn offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map_or(self.len, |next| next.saturating_sub(1));
        Some((start + position.character as usize).min(end))
    }

    /// Get the byte offset of the start of a line
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Get the number of lines
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_round_trip() {
        let index = LineIndex::new("query {\n  user\n}");
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(10), (1, 2));
        assert_eq!(index.offset(Position::new(1, 2)), Some(10));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_offset_clamps_to_line_end() {
        let index = LineIndex::new("ab\ncd");
        assert_eq!(index.offset(Position::new(0, 40)), Some(2));
        assert_eq!(index.offset(Position::new(1, 40)), Some(5));
        assert_eq!(index.offset(Position::new(2, 0)), None);
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("abc");
        assert_eq!(index.position(99), Position::new(0, 3));
    }
}
