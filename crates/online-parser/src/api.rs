//! Document-level drivers over [`OnlineParser`].

use std::ops::ControlFlow;

use graphql_types::Position;
use serde::{Deserialize, Serialize};

use crate::grammar::{RuleKind, Style};
use crate::parser::OnlineParser;
use crate::scanner::CharacterStream;
use crate::state::State;

/// A token together with the parser state right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextToken {
    /// Byte column where the token starts on its line.
    pub start: usize,
    /// Byte column where the token ends on its line.
    pub end: usize,
    pub string: String,
    pub state: State,
    pub style: Style,
}

impl ContextToken {
    /// The state suggestions should be computed from: the rule that was
    /// active before an invalid token, otherwise the token's own state.
    #[must_use]
    pub fn context_state(&self) -> State {
        if self.state.kind() == Some(RuleKind::Invalid) {
            self.state.prev_state().unwrap_or_else(|| self.state.clone())
        } else {
            self.state.clone()
        }
    }
}

/// Parse `text` from the start, calling `callback` after every token.
///
/// The callback receives the line's stream (positioned after the token), the
/// state, the token's style and the 0-based line number. It is called once
/// more at the end of each line, so empty lines are observed too. Returning
/// [`ControlFlow::Break`] stops the run; the returned token then describes the
/// token the callback stopped on.
pub fn run_online_parser<F>(text: &str, mut callback: F) -> ContextToken
where
    F: FnMut(&CharacterStream<'_>, &State, Style, usize) -> ControlFlow<()>,
{
    let parser = OnlineParser::new();
    let mut state = parser.start_state();
    // Nothing has been read yet, which is indistinguishable from whitespace.
    let mut style = Style::Ws;
    let mut stream = CharacterStream::new("");

    for (index, line) in text.split('\n').enumerate() {
        stream = CharacterStream::new(line);
        while !stream.eol() {
            style = parser.token(&mut stream, &mut state);
            if callback(&stream, &state, style, index).is_break() {
                return context_token(&stream, state, style);
            }
        }

        if callback(&stream, &state, style, index).is_break() {
            return context_token(&stream, state, style);
        }

        if state.is_empty() {
            state = parser.start_state();
        }
    }

    context_token(&stream, state, style)
}

fn context_token(stream: &CharacterStream<'_>, state: State, style: Style) -> ContextToken {
    ContextToken {
        start: stream.start(),
        end: stream.pos(),
        string: stream.current().to_string(),
        state,
        style,
    }
}

/// The token at `position`: the first token on the cursor's line that ends at
/// or after the cursor column. A cursor right after a token therefore belongs
/// to that token.
///
/// When no token on that line reaches the cursor (a column past the line's
/// end, or a line past the document's end) the last token of the document is
/// returned.
#[must_use]
pub fn token_at_position(text: &str, position: Position) -> ContextToken {
    let line = position.line as usize;
    let column = position.character as usize;
    run_online_parser(text, |stream, _, _, index| {
        if index == line && stream.pos() >= column {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
}

/// Result of a single [`tokenize`] step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenized {
    pub style: Style,
    /// Byte offsets of the consumed text within the line.
    pub start: usize,
    pub end: usize,
    pub state: State,
}

/// Run one parser step at the start of `line`, resuming from `state`.
#[must_use]
pub fn tokenize(line: &str, state: &State) -> Tokenized {
    let mut state = state.clone();
    let mut stream = CharacterStream::new(line);
    let style = OnlineParser::new().token(&mut stream, &mut state);
    Tokenized {
        style,
        start: 0,
        end: stream.pos(),
        state,
    }
}

/// A styled span of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineToken {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

/// Tokenize a whole line, resuming from `state`. Returns every span on the
/// line and the state to carry into the next line.
#[must_use]
pub fn tokenize_line(line: &str, state: &State) -> (Vec<LineToken>, State) {
    let parser = OnlineParser::new();
    let mut state = state.clone();
    let mut stream = CharacterStream::new(line);
    let mut tokens = Vec::new();

    while !stream.eol() {
        let start = stream.pos();
        let style = parser.token(&mut stream, &mut state);
        tokens.push(LineToken {
            start,
            end: stream.pos(),
            style,
        });
    }

    if state.is_empty() {
        state = parser.start_state();
    }
    (tokens, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_at_end_of_field() {
        let text = "{\n  user\n}";
        let token = token_at_position(text, Position::new(1, 6));
        assert_eq!(token.string, "user");
        assert_eq!(token.start, 2);
        assert_eq!(token.end, 6);
        assert_eq!(token.style, Style::Property);
        assert_eq!(token.state.kind(), Some(RuleKind::Field));
    }

    #[test]
    fn test_token_at_boundary_prefers_preceding_token() {
        let token = token_at_position("{ user }", Position::new(0, 1));
        assert_eq!(token.string, "{");
        assert_eq!(token.state.kind(), Some(RuleKind::SelectionSet));
    }

    #[test]
    fn test_token_on_empty_line() {
        let text = "{\n\n}";
        let token = token_at_position(text, Position::new(1, 0));
        assert_eq!(token.string, "");
        assert_eq!(token.state.kind(), Some(RuleKind::SelectionSet));
    }

    #[test]
    fn test_cursor_past_line_end_falls_back_to_last_token() {
        let token = token_at_position("{ a }", Position::new(0, 40));
        assert_eq!(token.string, "}");
        assert_eq!(token.state.kind(), Some(RuleKind::Document));
    }

    #[test]
    fn test_context_state_skips_invalid() {
        let token = token_at_position("qeury", Position::new(0, 5));
        assert_eq!(token.style, Style::InvalidChar);
        assert_eq!(token.state.kind(), Some(RuleKind::Invalid));
        assert_eq!(token.context_state().kind(), Some(RuleKind::Document));
    }

    #[test]
    fn test_run_visits_every_line() {
        let mut lines = Vec::new();
        run_online_parser("a\n\nb", |_, _, _, index| {
            lines.push(index);
            ControlFlow::Continue(())
        });
        lines.dedup();
        assert_eq!(lines, vec![0, 1, 2]);
    }

    #[test]
    fn test_tokenize_single_step() {
        let result = tokenize("query Q", &State::new());
        assert_eq!(result.style, Style::Keyword);
        assert_eq!(result.end, 5);
        assert_eq!(result.state.kind(), Some(RuleKind::Query));
    }

    #[test]
    fn test_tokenize_line_spans() {
        let (tokens, state) = tokenize_line("{ id }", &State::new());
        let spans: Vec<_> = tokens
            .iter()
            .map(|token| (token.start, token.end, token.style))
            .collect();
        assert_eq!(
            spans,
            vec![
                (0, 1, Style::Punctuation),
                (1, 2, Style::Ws),
                (2, 4, Style::Property),
                (4, 5, Style::Ws),
                (5, 6, Style::Punctuation),
            ]
        );
        assert_eq!(state.kind(), Some(RuleKind::Document));
    }
}
