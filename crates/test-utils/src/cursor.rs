use graphql_types::Position;

/// Marker used in test sources to denote the cursor.
pub const CURSOR_MARKER: char = '*';

/// Remove the cursor marker from `input` and return the cleaned text along
/// with the marker's position.
///
/// Columns are byte offsets into the line, matching [`Position`].
///
/// # Panics
///
/// Panics when `input` contains no marker or more than one.
#[must_use]
pub fn extract_cursor(input: &str) -> (String, Position) {
    let mut markers = input.match_indices(CURSOR_MARKER);
    let Some((offset, _)) = markers.next() else {
        panic!("no cursor marker `{CURSOR_MARKER}` in test input: {input:?}");
    };
    assert!(
        markers.next().is_none(),
        "more than one cursor marker in test input: {input:?}"
    );

    let before = &input[..offset];
    let line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    let character = offset - line_start;

    let mut text = String::with_capacity(input.len() - 1);
    text.push_str(before);
    text.push_str(&input[offset + CURSOR_MARKER.len_utf8()..]);

    (text, Position::new(line as u32, character as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let (text, position) = extract_cursor("{ us*er }");
        assert_eq!(text, "{ user }");
        assert_eq!(position, Position::new(0, 4));
    }

    #[test]
    fn test_multi_line() {
        let (text, position) = extract_cursor("query {\n  user {\n    *\n  }\n}");
        assert_eq!(text, "query {\n  user {\n    \n  }\n}");
        assert_eq!(position, Position::new(2, 4));
    }

    #[test]
    fn test_cursor_at_end() {
        let (text, position) = extract_cursor("{ human(id: \"1\") { *");
        assert_eq!(text, "{ human(id: \"1\") { ");
        assert_eq!(position, Position::new(0, 19));
    }

    #[test]
    #[should_panic(expected = "no cursor marker")]
    fn test_missing_marker_panics() {
        let _ = extract_cursor("{ user }");
    }
}
