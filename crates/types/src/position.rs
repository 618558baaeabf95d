//! Position and range types for source locations.

/// Byte offset range in a source text.
///
/// Used internally for text manipulation. Byte offsets are converted to
/// line/column [`Position`]s through a [`LineIndex`](crate::LineIndex) when
/// results are handed back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl OffsetRange {
    /// Create a new offset range.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific offset.
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this range in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `offset` falls inside the range, end included.
    ///
    /// A cursor sitting right after the last character of a name still
    /// refers to that name.
    #[must_use]
    pub const fn touches(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }
}

impl std::fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Position in a source text (0-indexed).
///
/// - `line` is 0-indexed (first line is 0)
/// - `character` is a 0-indexed UTF-8 byte column from the line start
///
/// Editor protocols that count UTF-16 code units convert at their own
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: u32,
    /// Byte column within the line (0-indexed)
    pub character: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.character.cmp(&other.character),
            ord => ord,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Range in a source text.
///
/// A range represents a span of text from `start` (inclusive) to `end` (exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a zero-width range at a specific position.
    #[must_use]
    pub const fn at(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns `true` if this is a zero-width range.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.line == self.end.line && self.start.character == self.end.character
    }

    /// Check if this range contains a position.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position >= self.start && position < self.end
    }

    /// Move the range down by `lines`, keeping columns.
    ///
    /// Used when a GraphQL block was lifted out of a larger host document.
    #[must_use]
    pub const fn shift_lines(self, lines: u32) -> Self {
        Self {
            start: Position::new(self.start.line + lines, self.start.character),
            end: Position::new(self.end.line + lines, self.end.character),
        }
    }
}
