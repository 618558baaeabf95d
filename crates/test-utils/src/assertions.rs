//! Snapshot formatting helpers.
//!
//! Results are rendered one per line so `insta` diffs stay readable.

use std::fmt::Display;

use graphql_types::Range;

/// Render a range as `line:col-line:col` using 0-based numbers, the same
/// numbers the API returns.
#[must_use]
pub fn format_range(range: Range) -> String {
    format!(
        "{}:{}-{}:{}",
        range.start.line, range.start.character, range.end.line, range.end.character
    )
}

/// Format one entry per line as `[n] <entry>`.
///
/// ```
/// use graphql_test_utils::assertions::format_list;
///
/// assert_eq!(format_list(&["a", "b"]), "[1] a\n[2] b");
/// assert_eq!(format_list::<&str>(&[]), "(empty)");
/// ```
#[must_use]
pub fn format_list<T: Display>(entries: &[T]) -> String {
    if entries.is_empty() {
        return String::from("(empty)");
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("[{}] {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format `(range, message)` pairs, e.g. diagnostics, sorted by position.
#[must_use]
pub fn format_ranged<T: AsRef<str>>(entries: &[(Range, T)]) -> String {
    if entries.is_empty() {
        return String::from("(no diagnostics)");
    }

    let mut sorted: Vec<_> = entries.iter().collect();
    sorted.sort_by_key(|(range, _)| (range.start, range.end));
    sorted
        .into_iter()
        .map(|(range, message)| format!("{} {}", format_range(*range), message.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_types::Position;

    #[test]
    fn test_format_list_empty() {
        let empty: Vec<String> = vec![];
        assert_eq!(format_list(&empty), "(empty)");
    }

    #[test]
    fn test_format_ranged_sorts() {
        let entries = vec![
            (
                Range::new(Position::new(2, 0), Position::new(2, 3)),
                "second",
            ),
            (
                Range::new(Position::new(0, 4), Position::new(0, 9)),
                "first",
            ),
        ];
        assert_eq!(format_ranged(&entries), "0:4-0:9 first\n2:0-2:3 second");
    }

    #[test]
    fn test_format_ranged_empty() {
        let empty: Vec<(Range, &str)> = vec![];
        assert_eq!(format_ranged(&empty), "(no diagnostics)");
    }
}
