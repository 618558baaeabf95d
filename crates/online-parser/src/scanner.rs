//! Character-level cursor over a single line of source text.

use regex::Regex;

/// Something the [`CharacterStream`] can test the next character (or the rest
/// of the line) against.
#[derive(Debug, Clone, Copy)]
pub enum Pattern<'p> {
    /// A single literal character.
    Char(char),
    /// A literal string. Single-character operations compare it against the
    /// next character only.
    Literal(&'p str),
    /// A character predicate such as [`is_ignored`](crate::is_ignored).
    Predicate(fn(char) -> bool),
    /// A regular expression. Matches must start at the cursor.
    Regex(&'p Regex),
}

impl Pattern<'_> {
    fn test_char(&self, ch: char) -> bool {
        match self {
            Self::Char(expected) => ch == *expected,
            Self::Literal(literal) => {
                let mut chars = literal.chars();
                chars.next() == Some(ch) && chars.next().is_none()
            }
            Self::Predicate(predicate) => predicate(ch),
            Self::Regex(regex) => {
                let mut buf = [0u8; 4];
                regex.is_match(ch.encode_utf8(&mut buf))
            }
        }
    }
}

/// A stream of characters over one line, modeled on an editor string stream.
///
/// `start` and `pos` are UTF-8 byte offsets into the line. `current()` is the
/// text between them, which is the most recently consumed token.
#[derive(Debug, Clone)]
pub struct CharacterStream<'a> {
    source: &'a str,
    start: usize,
    pos: usize,
}

impl<'a> CharacterStream<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            pos: 0,
        }
    }

    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Byte offset where the last consumed token began.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the cursor.
    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// At the start of the line?
    #[must_use]
    pub const fn sol(&self) -> bool {
        self.pos == 0
    }

    /// At the end of the line?
    #[must_use]
    pub const fn eol(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        self.source.get(self.pos..).unwrap_or_default()
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume the next character if it matches `pattern`.
    pub fn eat(&mut self, pattern: Pattern<'_>) -> Option<char> {
        let ch = self.peek().filter(|ch| pattern.test_char(*ch))?;
        self.start = self.pos;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume characters while they match `pattern`, treating the run as one
    /// token. Returns whether anything was consumed.
    pub fn eat_while(&mut self, pattern: Pattern<'_>) -> bool {
        let begin = self.pos;
        while let Some(ch) = self.peek().filter(|ch| pattern.test_char(*ch)) {
            self.pos += ch.len_utf8();
        }
        if self.pos > begin {
            self.start = begin;
            true
        } else {
            false
        }
    }

    /// Consume ignored characters (whitespace, commas, BOM).
    pub fn eat_space(&mut self) -> bool {
        self.eat_while(Pattern::Predicate(crate::is_ignored))
    }

    /// Test `pattern` anchored at the cursor, consuming it when `consume` is
    /// set. Literal patterns honor `case_fold`; regexes carry their own flags.
    pub fn match_pattern(
        &mut self,
        pattern: Pattern<'_>,
        consume: bool,
        case_fold: bool,
    ) -> Option<&'a str> {
        let matched = self.peek_match(pattern, case_fold)?;
        if consume {
            self.start = self.pos;
            self.pos += matched.len();
        }
        Some(matched)
    }

    /// Non-consuming lookahead, used by grammar choice rules.
    #[must_use]
    pub fn lookahead(&self, regex: &Regex) -> bool {
        self.peek_match(Pattern::Regex(regex), false).is_some()
    }

    fn peek_match(&self, pattern: Pattern<'_>, case_fold: bool) -> Option<&'a str> {
        let rest = self.rest();
        match pattern {
            Pattern::Regex(regex) => regex
                .find(rest)
                .filter(|m| m.start() == 0)
                .map(|m| m.as_str()),
            Pattern::Literal(literal) => {
                let candidate = rest.get(..literal.len())?;
                let equal = if case_fold {
                    candidate.eq_ignore_ascii_case(literal)
                } else {
                    candidate == literal
                };
                equal.then_some(candidate)
            }
            Pattern::Char(_) | Pattern::Predicate(_) => {
                let ch = rest.chars().next().filter(|ch| pattern.test_char(*ch))?;
                rest.get(..ch.len_utf8())
            }
        }
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.source.len();
    }

    /// Move the cursor to `position`, clamped to the line and snapped back to
    /// a character boundary.
    pub fn skip_to(&mut self, position: usize) {
        self.pos = self.boundary_at_or_before(position);
    }

    /// Rewind the cursor by `bytes`.
    pub fn back_up(&mut self, bytes: usize) {
        self.pos = self.boundary_at_or_before(self.pos.saturating_sub(bytes));
    }

    fn boundary_at_or_before(&self, position: usize) -> usize {
        let mut position = position.min(self.source.len());
        while !self.source.is_char_boundary(position) {
            position -= 1;
        }
        position
    }

    /// The text of the most recently consumed token.
    #[must_use]
    pub fn current(&self) -> &'a str {
        self.source.get(self.start..self.pos).unwrap_or_default()
    }

    /// Width of the line's leading whitespace. A tab counts as 2.
    #[must_use]
    pub fn indentation(&self) -> usize {
        self.source
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .map(|ch| if ch == '\t' { 2 } else { 1 })
            .sum()
    }
}
