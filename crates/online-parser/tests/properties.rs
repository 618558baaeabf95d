//! Property tests for the online parser.
//!
//! The parser must never panic and must be resumable from any saved line
//! state.

use graphql_online_parser::{tokenize, tokenize_line, LineToken, State};
use proptest::prelude::*;

/// GraphQL-ish fragments stitched together into plausible (and implausible)
/// documents.
fn arb_graphql_piece() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("query"),
        Just("mutation Save($id: ID!)"),
        Just("fragment F on User"),
        Just("{"),
        Just("}"),
        Just("("),
        Just(")"),
        Just("user(id: \"1\")"),
        Just("...F"),
        Just("... on Admin"),
        Just("@include(if: $flag)"),
        Just("\"\"\"block"),
        Just("end\"\"\""),
        Just("# comment"),
        Just("type T implements A & B"),
        Just("union U = | A | B"),
        Just("extend type Query"),
        Just("[Int!]!"),
        Just("%%"),
        Just("\n"),
        Just(" "),
    ]
}

fn arb_document() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_graphql_piece(), 0..40).prop_map(|pieces| pieces.join(" "))
}

fn tokenize_document(lines: &[&str], mut state: State) -> (Vec<Vec<LineToken>>, State) {
    let mut all = Vec::new();
    for line in lines {
        let (tokens, next) = tokenize_line(line, &state);
        all.push(tokens);
        state = next;
    }
    (all, state)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn tokenize_never_panics_on_arbitrary_text(text in any::<String>()) {
        let state = State::new();
        for line in text.split('\n') {
            let result = tokenize(line, &state);
            prop_assert!(result.end <= line.len());
        }
    }

    #[test]
    fn tokenize_line_covers_the_line(text in "\\PC{0,80}") {
        let (tokens, _) = tokenize_line(&text, &State::new());
        let mut expected_start = 0;
        for token in &tokens {
            prop_assert_eq!(token.start, expected_start);
            prop_assert!(token.end > token.start);
            expected_start = token.end;
        }
        prop_assert_eq!(expected_start, text.len());
    }

    #[test]
    fn resuming_from_a_saved_line_state_matches_full_run(
        document in arb_document(),
        split in 0usize..64,
    ) {
        let lines: Vec<&str> = document.split('\n').collect();
        let split = split % (lines.len() + 1);

        let (full_tokens, full_state) = tokenize_document(&lines, State::new());

        let (head_tokens, saved) = tokenize_document(&lines[..split], State::new());
        // The saved state survives a serialization round trip, as an editor
        // cache would store it.
        let saved: State = serde_json::from_str(&serde_json::to_string(&saved).unwrap()).unwrap();
        let (tail_tokens, resumed_state) = tokenize_document(&lines[split..], saved);

        let mut resumed_tokens = head_tokens;
        resumed_tokens.extend(tail_tokens);
        prop_assert_eq!(resumed_tokens, full_tokens);
        prop_assert_eq!(resumed_state, full_state);
    }
}
