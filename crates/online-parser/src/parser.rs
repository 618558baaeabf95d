//! The online parser: one token per call, never fails.

use crate::grammar::{ChoiceFn, Item, Rule, RuleKind, Step, Style};
use crate::lexer::{lex, TokenKind, BLOCK_STRING_END, NON_WHITESPACE_RUN, SINGLE_WHITESPACE};
use crate::scanner::{CharacterStream, Pattern};
use crate::state::State;

const DEFAULT_TAB_SIZE: usize = 2;

/// Incremental GraphQL parser.
///
/// Each [`token`](Self::token) call consumes exactly one token (or one run of
/// ignored characters) from the stream, updates `state` and returns the token's
/// style. Input the grammar cannot place yields [`Style::InvalidChar`] and
/// leaves the rule stack where it was.
#[derive(Debug, Clone, Copy)]
pub struct OnlineParser {
    tab_size: usize,
}

impl Default for OnlineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OnlineParser {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
        }
    }

    #[must_use]
    pub fn start_state(&self) -> State {
        State::new()
    }

    /// Consume one token from `stream`.
    pub fn token(&self, stream: &mut CharacterStream<'_>, state: &mut State) -> Style {
        if state.in_block_string {
            if stream
                .match_pattern(Pattern::Regex(&BLOCK_STRING_END), true, false)
                .is_some()
            {
                state.in_block_string = false;
            } else {
                stream.skip_to_end();
            }
            return Style::String;
        }

        if state.current().is_some_and(|frame| frame.rule().is_empty()) {
            state.pop();
        } else if state.needs_advance {
            state.needs_advance = false;
            advance_rule(state, true);
        }

        if stream.sol() {
            state.indent_level = Some(stream.indentation() / self.tab_size);
        }

        if stream.eat_space() {
            return Style::Ws;
        }
        if stream.eol() {
            return Style::InvalidChar;
        }

        let Some(token) = lex(stream) else {
            if stream
                .match_pattern(Pattern::Regex(&NON_WHITESPACE_RUN), true, false)
                .is_none()
            {
                // Whitespace the GraphQL grammar does not ignore.
                stream.match_pattern(Pattern::Regex(&SINGLE_WHITESPACE), true, false);
            }
            state.push(RuleKind::Invalid);
            return Style::InvalidChar;
        };

        if token.kind == TokenKind::Comment {
            state.push(RuleKind::Comment);
            return Style::Comment;
        }

        let backup = state.clone();

        if token.kind == TokenKind::Punctuation {
            track_levels(state, &token.value);
        }

        while let Some(frame) = state.current() {
            let rule = frame.rule();
            let expected = if let Some(choose) = rule_choice(&rule) {
                if frame.step == 0 && !frame.needs_separator {
                    choose(&token, stream).map(Item::Rule)
                } else {
                    None
                }
            } else {
                frame.current_step().and_then(|step| {
                    if frame.needs_separator {
                        step.separator().map(|separator| Item::Terminal(separator.terminal))
                    } else {
                        Some(step.item())
                    }
                })
            };

            match expected {
                Some(Item::Rule(kind)) => {
                    state.push(kind);
                    continue;
                }
                Some(Item::Terminal(terminal)) if terminal.matches(&token) => {
                    if let Some(patch) = terminal.patch(&token) {
                        state.apply(patch);
                    }
                    // Punctuation advances now; other tokens advance lazily so
                    // the state still describes them until the next token.
                    if token.kind == TokenKind::Punctuation {
                        advance_rule(state, true);
                    } else {
                        state.needs_advance = true;
                    }
                    return terminal.style;
                }
                _ => unsuccessful(state),
            }
        }

        tracing::trace!(token = %token.value, "token does not fit the grammar here");
        *state = backup;
        state.push(RuleKind::Invalid);
        Style::InvalidChar
    }
}

fn rule_choice(rule: &Rule) -> Option<ChoiceFn> {
    match rule {
        Rule::Choice(choose) => Some(*choose),
        Rule::Sequence(_) => None,
    }
}

fn track_levels(state: &mut State, punctuation: &str) {
    if punctuation.starts_with(['{', '(', '[']) {
        if let Some(indent) = state.indent_level {
            state.levels.push(indent + 1);
        }
    } else if punctuation.starts_with(['}', ')', ']']) {
        state.levels.pop();
        if let (Some(indent), Some(&last)) = (state.indent_level, state.levels.last()) {
            if indent > 0 && last < indent {
                state.indent_level = Some(last);
            }
        }
    }
}

fn is_list(state: &State) -> bool {
    state
        .current()
        .and_then(|frame| frame.current_step())
        .is_some_and(|step| step.is_list())
}

/// Move past the current step, popping every rule that completes.
fn advance_rule(state: &mut State, successful: bool) {
    if is_list(state) {
        let separator = state
            .current()
            .and_then(|frame| frame.current_step())
            .and_then(|step| step.separator());
        if let (Some(separator), Some(frame)) = (separator, state.current_mut()) {
            frame.needs_separator = !frame.needs_separator;
            // An optional separator lets the list repeat straight away.
            if !frame.needs_separator && separator.optional {
                return;
            }
        }
        // A matched item lets the list repeat.
        if successful {
            return;
        }
    }

    if let Some(frame) = state.current_mut() {
        frame.needs_separator = false;
        frame.step += 1;
    }

    while state
        .current()
        .is_some_and(|frame| frame.rule().is_complete(frame.step))
    {
        state.pop();

        let separator = state
            .current()
            .and_then(|frame| frame.current_step())
            .filter(|step| step.is_list())
            .map(|step| step.separator().is_some());
        let Some(frame) = state.current_mut() else {
            break;
        };
        match separator {
            // A list step stays put so it can repeat.
            Some(true) => frame.needs_separator = !frame.needs_separator,
            Some(false) => {}
            None => {
                frame.needs_separator = false;
                frame.step += 1;
            }
        }
    }
}

/// Unwind after a failed match to the nearest optional or list step and skip
/// past it.
fn unsuccessful(state: &mut State) {
    while state.current().is_some_and(|frame| {
        !frame
            .current_step()
            .is_some_and(Step::is_skippable)
    }) {
        state.pop();
    }

    if state.current().is_some() {
        advance_rule(state, false);
    }
}
