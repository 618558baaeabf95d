//! Lexical rules.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scanner::{CharacterStream, Pattern};

/// Lexical classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Name,
    Punctuation,
    Number,
    String,
    Comment,
}

/// A lexed token: its kind and raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// GraphQL ignored characters: whitespace, line terminators, commas, BOM and
/// the non-breaking space.
#[must_use]
pub const fn is_ignored(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | ',' | '\n' | '\r' | '\u{feff}' | '\u{a0}'
    )
}

#[allow(clippy::unwrap_used)]
fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static NAME: LazyLock<Regex> = LazyLock::new(|| regex(r"^[_A-Za-z][_0-9A-Za-z]*"));
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^(?:!|\$|\(|\)|\.\.\.|:|=|&|@|\[|\]|\{|\||\})"));
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| regex(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?"));
// The closing quote is optional so unterminated strings still lex while typing.
static STRING: LazyLock<Regex> = LazyLock::new(|| {
    regex(
        r#"^(?:"""(?:\\"""|[^"]|"[^"]|""[^"])*(?:""")?|"(?:[^"\\]|\\(?:"|/|\\|b|f|n|r|t|u[0-9a-fA-F]{4}))*"?)"#,
    )
});
static COMMENT: LazyLock<Regex> = LazyLock::new(|| regex(r"^#.*"));

pub(crate) static BLOCK_STRING_END: LazyLock<Regex> = LazyLock::new(|| regex(r#"^.*""""#));
pub(crate) static NON_WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| regex(r"^\S+"));
pub(crate) static SINGLE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"^\s"));

/// Lex rules in the order they are tried.
static LEX_RULES: [(TokenKind, &LazyLock<Regex>); 5] = [
    (TokenKind::Name, &NAME),
    (TokenKind::Punctuation, &PUNCTUATION),
    (TokenKind::Number, &NUMBER),
    (TokenKind::String, &STRING),
    (TokenKind::Comment, &COMMENT),
];

/// Consume the next token from `stream`, or return `None` (leaving the stream
/// untouched) when nothing lexes.
pub fn lex(stream: &mut CharacterStream<'_>) -> Option<Token> {
    LEX_RULES.iter().find_map(|(kind, rule)| {
        stream
            .match_pattern(Pattern::Regex(rule), true, false)
            .map(|value| Token::new(*kind, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(line: &str) -> Vec<(TokenKind, String)> {
        let mut stream = CharacterStream::new(line);
        let mut tokens = Vec::new();
        while !stream.eol() {
            if stream.eat_space() {
                continue;
            }
            match lex(&mut stream) {
                Some(token) => tokens.push((token.kind, token.value)),
                None => break,
            }
        }
        tokens
    }

    #[test]
    fn test_lex_operation_header() {
        let tokens = lex_all("query Q($id: ID!) {");
        let kinds: Vec<_> = tokens.iter().map(|(kind, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
                TokenKind::Name,
                TokenKind::Punctuation,
                TokenKind::Name,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
            ]
        );
    }

    #[test]
    fn test_lex_spread_is_one_token() {
        let tokens = lex_all("...Frag");
        assert_eq!(tokens[0], (TokenKind::Punctuation, "...".to_string()));
        assert_eq!(tokens[1], (TokenKind::Name, "Frag".to_string()));
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(lex_all("-12.5e3"), vec![(TokenKind::Number, "-12.5e3".to_string())]);
        assert_eq!(lex_all("0"), vec![(TokenKind::Number, "0".to_string())]);
    }

    #[test]
    fn test_lex_unterminated_strings() {
        assert_eq!(
            lex_all(r#""abc"#),
            vec![(TokenKind::String, r#""abc"#.to_string())]
        );
        assert_eq!(
            lex_all(r#""""block"#),
            vec![(TokenKind::String, r#""""block"#.to_string())]
        );
        assert_eq!(
            lex_all(r#""""done""""#),
            vec![(TokenKind::String, r#""""done""""#.to_string())]
        );
    }

    #[test]
    fn test_lex_comment_takes_rest_of_line() {
        assert_eq!(
            lex_all("# a comment { }"),
            vec![(TokenKind::Comment, "# a comment { }".to_string())]
        );
    }

    #[test]
    fn test_unlexable_input_leaves_stream() {
        let mut stream = CharacterStream::new("%%");
        assert!(lex(&mut stream).is_none());
        assert_eq!(stream.pos(), 0);
    }

    #[test]
    fn test_is_ignored() {
        for ch in [' ', '\t', ',', '\n', '\r', '\u{feff}', '\u{a0}'] {
            assert!(is_ignored(ch), "{ch:?}");
        }
        assert!(!is_ignored('a'));
        assert!(!is_ignored('\u{2003}'));
    }
}
