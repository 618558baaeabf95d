//! Filtering of completion candidates against the token being typed.

use crate::types::CompletionItem;

/// Largest edit distance accepted by the typo fallback.
const MAX_TYPO_DISTANCE: usize = 2;

/// Filter `items` against the text of the token under the cursor.
///
/// With nothing typed, deprecated items are dropped unless every item is
/// deprecated. Otherwise prefix matches come first, then substring matches,
/// both in source order. When neither matches, items within a
/// Damerau-Levenshtein distance of two are kept, closest first.
#[must_use]
pub fn hint_list(token: &str, items: Vec<CompletionItem>) -> Vec<CompletionItem> {
    let text = normalize(token);
    if text.is_empty() {
        return filter_non_empty(items, |item| !item.deprecated);
    }

    let mut prefix = Vec::new();
    let mut substring = Vec::new();
    let mut rest = Vec::new();
    for item in items {
        let label = normalize(&item.label);
        if label.starts_with(&text) {
            prefix.push(item);
        } else if label.contains(&text) {
            substring.push(item);
        } else {
            rest.push((strsim::damerau_levenshtein(&text, &label), item));
        }
    }

    prefix.append(&mut substring);
    if !prefix.is_empty() {
        return filter_non_empty(prefix, |item| !item.deprecated);
    }

    rest.retain(|(distance, _)| *distance <= MAX_TYPO_DISTANCE);
    rest.sort_by_key(|(distance, _)| *distance);
    filter_non_empty(rest.into_iter().map(|(_, item)| item).collect(), |item| {
        !item.deprecated
    })
}

/// Keep the items matching `predicate`, or all of them if none match.
fn filter_non_empty<F>(items: Vec<CompletionItem>, predicate: F) -> Vec<CompletionItem>
where
    F: Fn(&CompletionItem) -> bool,
{
    if items.iter().any(&predicate) {
        items.into_iter().filter(|item| predicate(item)).collect()
    } else {
        items
    }
}

/// Lowercase and strip everything but word characters, so `{`, `:` and `$`
/// count as nothing typed.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompletionKind;

    fn items(labels: &[&str]) -> Vec<CompletionItem> {
        labels
            .iter()
            .map(|label| CompletionItem::new(*label, CompletionKind::Field))
            .collect()
    }

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn test_empty_token_keeps_everything() {
        let result = hint_list("", items(&["id", "name"]));
        assert_eq!(labels(&result), vec!["id", "name"]);
        let result = hint_list("{", items(&["id", "name"]));
        assert_eq!(labels(&result), vec!["id", "name"]);
    }

    #[test]
    fn test_prefix_before_substring() {
        let result = hint_list("na", items(&["nickname", "name", "id"]));
        assert_eq!(labels(&result), vec!["name", "nickname"]);
    }

    #[test]
    fn test_case_insensitive() {
        let result = hint_list("USER", items(&["userName", "id"]));
        assert_eq!(labels(&result), vec!["userName"]);
    }

    #[test]
    fn test_typo_fallback() {
        let result = hint_list("qeury", items(&["query", "mutation", "fragment"]));
        assert_eq!(labels(&result), vec!["query"]);
    }

    #[test]
    fn test_no_match_returns_nothing() {
        let result = hint_list("zzzzzz", items(&["query", "mutation"]));
        assert!(result.is_empty());
    }

    #[test]
    fn test_deprecated_dropped_unless_all_deprecated() {
        let mut list = items(&["name", "oldName"]);
        list[1].deprecated = true;
        assert_eq!(labels(&hint_list("", list)), vec!["name"]);

        let mut list = items(&["oldName"]);
        list[0].deprecated = true;
        assert_eq!(labels(&hint_list("", list)), vec!["oldName"]);
    }
}
