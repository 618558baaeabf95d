//! Syntax and validation diagnostics for executable documents.
//!
//! The pipeline runs in two passes. A syntax pass parses the document and
//! reports at most one error, positioned on the offending token of the line
//! by replaying the online parser. When the document parses and a schema is
//! available, a validation pass checks it against the schema together with
//! the external fragments it depends on, then runs the rule set.

use std::collections::{HashMap, HashSet};

use apollo_compiler::ast;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use apollo_parser::Parser;
use graphql_online_parser::{lex, tokenize_line, CharacterStream, State, Style, TokenKind};
use graphql_types::{DiagnosticSeverity, LineIndex, OffsetRange, Position, Range};

use crate::rules::{NoDeprecated, ValidationRule};
use crate::types::{Diagnostic, FragmentInfo};

pub const SYNTAX_SOURCE: &str = "GraphQL: Syntax";
pub const VALIDATION_SOURCE: &str = "GraphQL: Validation";

/// Path reported to the compiler for the document under validation.
const DOCUMENT_PATH: &str = "document.graphql";

/// Keywords that precede the name of the node a validation error points at.
const LEADING_KEYWORDS: [&str; 4] = ["query", "mutation", "subscription", "fragment"];

/// Inputs to [`diagnostics`] beyond the text and schema.
#[derive(Default, Clone, Copy)]
pub struct DiagnosticsOptions<'a> {
    /// Rules run after schema validation, in addition to the built-in ones.
    pub custom_rules: &'a [Box<dyn ValidationRule>],
    /// Fragments defined in other files that the document may spread.
    pub external_fragments: &'a [FragmentInfo],
    /// Line of the host file where the document starts, for GraphQL embedded
    /// in another language.
    pub line_offset: u32,
}

/// Collect diagnostics for `text`.
///
/// Without a schema only the syntax pass runs.
#[must_use]
pub fn diagnostics(
    text: &str,
    schema: Option<&Valid<Schema>>,
    options: &DiagnosticsOptions<'_>,
) -> Vec<Diagnostic> {
    let tree = Parser::new(text).parse();
    if let Some(error) = tree.errors().min_by_key(|error| error.index()) {
        let token = error.data();
        let unexpected = if token.is_empty() || token == "EOF" {
            "<EOF>".to_string()
        } else {
            format!("\"{token}\"")
        };
        let message = format!("Syntax Error: Unexpected {unexpected}: {}", error.message());
        let position = LineIndex::new(text).position(error.index());
        let range = syntax_range(text, position);
        tracing::trace!(?range, "syntax error");
        return vec![Diagnostic::new(
            range.shift_lines(options.line_offset),
            DiagnosticSeverity::Error,
            message,
            SYNTAX_SOURCE,
        )];
    }

    let Some(schema) = schema else {
        return Vec::new();
    };

    let line_index = LineIndex::new(text);
    let last_line = line_index.line_count().saturating_sub(1);
    let mut results: Vec<Diagnostic> = validate(text, schema, options.external_fragments)
        .into_iter()
        .filter(|diagnostic| diagnostic.range.start.line as usize <= last_line)
        .collect();

    let document = tree.document();
    let builtin: [&dyn ValidationRule; 1] = [&NoDeprecated];
    let rules = builtin
        .into_iter()
        .chain(options.custom_rules.iter().map(|rule| &**rule));
    for rule in rules {
        for violation in rule.check(&document, schema) {
            for range in &violation.ranges {
                results.push(
                    Diagnostic::new(
                        line_index.range(*range),
                        rule.severity(),
                        violation.message.clone(),
                        rule.source(),
                    )
                    .with_code(rule.name()),
                );
            }
        }
    }

    for diagnostic in &mut results {
        diagnostic.range = diagnostic.range.shift_lines(options.line_offset);
    }
    results
}

/// Replay the online parser up to the error line and pick the token the
/// error sits on.
///
/// A token covering the error column wins, then the first invalid token on
/// the line, then the last token of the line.
fn syntax_range(text: &str, position: Position) -> Range {
    let mut state = State::new();
    let error_line = position.line as usize;

    for (number, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let (tokens, next) = tokenize_line(line, &state);
        if number < error_line {
            state = next;
            continue;
        }

        let column = position.character as usize;
        let token = tokens
            .iter()
            .find(|token| token.style != Style::Ws && token.start <= column && column < token.end)
            .or_else(|| tokens.iter().find(|token| token.style == Style::InvalidChar))
            .or_else(|| tokens.last());

        return match token {
            Some(token) => Range::new(
                Position::new(position.line, token.start as u32),
                Position::new(position.line, token.end as u32),
            ),
            None => Range::at(position),
        };
    }

    Range::at(position)
}

/// Schema validation of the executable definitions in `text`, with the
/// external fragments appended so that spreads resolve.
fn validate(text: &str, schema: &Valid<Schema>, fragments: &[FragmentInfo]) -> Vec<Diagnostic> {
    let mut full = text.to_string();
    for fragment in fragments {
        full.push_str("\n\n");
        full.push_str(&fragment.definition.to_string());
    }

    let mut document = match ast::Document::parse(&full, DOCUMENT_PATH) {
        Ok(document) => document,
        Err(with_errors) => with_errors.partial,
    };
    // Type-system definitions are applied to the schema by the cache.
    document.definitions.retain(|definition| {
        matches!(
            definition,
            ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_)
        )
    });
    if document.definitions.is_empty() {
        return Vec::new();
    }

    let Err(with_errors) = document.to_executable_validate(schema) else {
        return Vec::new();
    };
    // Fragments spread only from other files are not unused.
    let unreached = unreached_fragment_starts(&document);

    let line_index = LineIndex::new(&full);
    let mut results = Vec::new();
    for diagnostic in with_errors.errors.iter() {
        let Some(location) = diagnostic.line_column_range() else {
            continue;
        };
        if unreached.contains(&(location.start.line, location.start.column)) {
            continue;
        }
        let message = diagnostic.error.to_string();
        let start = char_offset(&full, &line_index, location.start.line, location.start.column);
        let end = char_offset(&full, &line_index, location.end.line, location.end.column);
        let range = narrow_to_name(&full, OffsetRange::new(start, end.max(start)));

        results.push(Diagnostic::new(
            line_index.range(range),
            DiagnosticSeverity::Error,
            message,
            VALIDATION_SOURCE,
        ));
    }
    results
}

/// 1-based start positions of the fragment definitions in `document` that
/// no operation of the same document reaches, directly or through other
/// fragments.
fn unreached_fragment_starts(document: &ast::Document) -> HashSet<(usize, usize)> {
    let fragments: HashMap<&str, &ast::FragmentDefinition> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::FragmentDefinition(fragment) => {
                Some((fragment.name.as_str(), &**fragment))
            }
            _ => None,
        })
        .collect();

    let mut pending: Vec<&ast::Selection> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
        .flat_map(|operation| operation.selection_set.iter())
        .collect();
    let mut reached = HashSet::new();
    while let Some(selection) = pending.pop() {
        match selection {
            ast::Selection::Field(field) => pending.extend(field.selection_set.iter()),
            ast::Selection::InlineFragment(inline) => pending.extend(inline.selection_set.iter()),
            ast::Selection::FragmentSpread(spread) => {
                let name = spread.fragment_name.as_str();
                if let Some(fragment) = fragments.get(name) {
                    if reached.insert(name) {
                        pending.extend(fragment.selection_set.iter());
                    }
                }
            }
        }
    }

    document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::FragmentDefinition(fragment)
                if !reached.contains(fragment.name.as_str()) =>
            {
                fragment.line_column_range(&document.sources)
            }
            _ => None,
        })
        .map(|range| (range.start.line, range.start.column))
        .collect()
}

/// Byte offset of a 1-based line and character column.
fn char_offset(text: &str, line_index: &LineIndex, line: usize, column: usize) -> usize {
    let Some(line_start) = line_index.line_start(line.saturating_sub(1)) else {
        return text.len();
    };
    text[line_start..]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(text.len(), |(offset, _)| line_start + offset)
}

/// Shrink a node's range to its name or variable, skipping a leading
/// definition keyword, `...`, `... on` or `@`.
fn narrow_to_name(text: &str, range: OffsetRange) -> OffsetRange {
    let Some(slice) = text.get(range.start..range.end) else {
        return range;
    };
    let mut stream = CharacterStream::new(slice);
    let mut after_spread = false;

    loop {
        stream.eat_space();
        let start = stream.pos();
        let Some(token) = lex(&mut stream) else {
            return range;
        };
        match (token.kind, token.value.as_str()) {
            (TokenKind::Name, "on") if after_spread => {}
            (TokenKind::Name, keyword) if LEADING_KEYWORDS.contains(&keyword) && start == 0 => {}
            (TokenKind::Name, _) => {
                return OffsetRange::new(range.start + start, range.start + stream.pos());
            }
            (TokenKind::Punctuation, "...") => after_spread = true,
            (TokenKind::Punctuation, "@") => {}
            (TokenKind::Punctuation, "$") => {
                return match lex(&mut stream) {
                    Some(name) if name.kind == TokenKind::Name => {
                        OffsetRange::new(range.start + start, range.start + stream.pos())
                    }
                    _ => range,
                };
            }
            _ => return range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleViolation;
    use apollo_parser::cst::{self, CstNode};
    use graphql_test_utils::assertions::format_ranged;
    use std::path::PathBuf;
    use std::sync::Arc;

    const SCHEMA: &str = r#"
        type Query {
          user(id: ID!): User
          users(first: Int): [User]
        }
        type User {
          id: ID!
          name: String
          username: String @deprecated(reason: "Use name")
        }
    "#;

    fn schema() -> Valid<Schema> {
        Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap()
    }

    fn messages(diagnostics: &[Diagnostic]) -> String {
        let ranged: Vec<_> = diagnostics
            .iter()
            .map(|diagnostic| (diagnostic.range, diagnostic.message.as_str()))
            .collect();
        format_ranged(&ranged)
    }

    fn fragment(source: &str) -> FragmentInfo {
        let document = ast::Document::parse(source, "fragments.graphql").unwrap();
        let definition = document
            .definitions
            .iter()
            .find_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => Some(fragment.clone()),
                _ => None,
            })
            .unwrap();
        FragmentInfo {
            file_path: PathBuf::from("fragments.graphql"),
            content: Arc::from(source),
            definition,
        }
    }

    #[test]
    fn test_syntax_error_on_misspelled_keyword() {
        let found = diagnostics("qeury", None, &DiagnosticsOptions::default());
        assert_eq!(found.len(), 1);
        let diagnostic = &found[0];
        assert_eq!(diagnostic.source, SYNTAX_SOURCE);
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Error);
        assert!(diagnostic.message.contains("\"qeury\""), "{}", diagnostic.message);
        assert_eq!(
            diagnostic.range,
            Range::new(Position::new(0, 0), Position::new(0, 5))
        );
    }

    #[test]
    fn test_syntax_error_only_reports_first() {
        let found = diagnostics(
            "query {\n  user(id: ) {\n}\n",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start.line, 1);
    }

    #[test]
    fn test_unexpected_eof() {
        let found = diagnostics("{ user(id: 1) {", None, &DiagnosticsOptions::default());
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("<EOF>"), "{}", found[0].message);
    }

    #[test]
    fn test_no_schema_skips_validation() {
        let found = diagnostics("{ nope }", None, &DiagnosticsOptions::default());
        assert!(found.is_empty());
    }

    #[test]
    fn test_unknown_field_highlights_name() {
        let text = "query Q {\n  user(id: 1) {\n    nope\n  }\n}";
        let found = diagnostics(text, Some(&schema()), &DiagnosticsOptions::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, VALIDATION_SOURCE);
        assert_eq!(
            found[0].range,
            Range::new(Position::new(2, 4), Position::new(2, 8))
        );
    }

    #[test]
    fn test_external_fragment_resolves() {
        let options = DiagnosticsOptions {
            external_fragments: &[fragment("fragment UserFields on User { id name }")],
            ..DiagnosticsOptions::default()
        };
        let found = diagnostics("{ user(id: 1) { ...UserFields } }", Some(&schema()), &options);
        assert!(found.is_empty(), "{}", messages(&found));
    }

    #[test]
    fn test_missing_fragment_reported() {
        let found = diagnostics(
            "{ user(id: 1) { ...UserFields } }",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start, Position::new(0, 19));
    }

    #[test]
    fn test_errors_inside_external_fragments_dropped() {
        let options = DiagnosticsOptions {
            external_fragments: &[fragment("fragment UserFields on User { id nope }")],
            ..DiagnosticsOptions::default()
        };
        let found = diagnostics("{ user(id: 1) { ...UserFields } }", Some(&schema()), &options);
        assert!(found.is_empty(), "{}", messages(&found));
    }

    #[test]
    fn test_fragment_only_document_is_not_unused() {
        let found = diagnostics(
            "fragment UserFields on User { id }\nfragment NameFields on User { name ...UserFields }",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert!(found.is_empty(), "{}", messages(&found));
    }

    #[test]
    fn test_unreached_fragment_body_is_still_validated() {
        let found = diagnostics(
            "fragment UserFields on User {\n  id\n  nope\n}",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert_eq!(found.len(), 1, "{}", messages(&found));
        assert_eq!(
            found[0].range,
            Range::new(Position::new(2, 2), Position::new(2, 6))
        );
    }

    #[test]
    fn test_unreached_fragment_starts() {
        let document = ast::Document::parse(
            "query Q { user(id: 1) { ...A } }\nfragment A on User { ...B }\nfragment B on User { id }\nfragment C on User { id }",
            DOCUMENT_PATH,
        )
        .unwrap();
        let starts: Vec<_> = unreached_fragment_starts(&document).into_iter().collect();
        assert_eq!(starts, vec![(4, 1)]);
    }

    #[test]
    fn test_deprecated_usage_warns() {
        let found = diagnostics(
            "{ user(id: 1) { username } }",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(found[0].source, "GraphQL: Deprecation");
        assert_eq!(found[0].code.as_deref(), Some("no_deprecated"));
        insta::assert_snapshot!(messages(&found), @"0:16-0:24 The field User.username is deprecated. Use name");
    }

    struct NoUsersList;

    impl ValidationRule for NoUsersList {
        fn name(&self) -> &'static str {
            "no_users_list"
        }

        fn check(&self, document: &cst::Document, _schema: &Valid<Schema>) -> Vec<RuleViolation> {
            let text = document.syntax().to_string();
            text.match_indices("users")
                .map(|(offset, _)| {
                    RuleViolation::new(
                        "Avoid listing users",
                        OffsetRange::new(offset, offset + "users".len()),
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_rule() {
        let rules: Vec<Box<dyn ValidationRule>> = vec![Box::new(NoUsersList)];
        let options = DiagnosticsOptions {
            custom_rules: &rules,
            ..DiagnosticsOptions::default()
        };
        let found = diagnostics("{ users { id } }", Some(&schema()), &options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code.as_deref(), Some("no_users_list"));
        assert_eq!(found[0].source, VALIDATION_SOURCE);
    }

    #[test]
    fn test_line_offset_shifts_ranges() {
        let options = DiagnosticsOptions {
            line_offset: 10,
            ..DiagnosticsOptions::default()
        };
        let found = diagnostics("{ user(id: 1) { nope } }", Some(&schema()), &options);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range.start.line, 10);

        let found = diagnostics("qeury", None, &options);
        assert_eq!(found[0].range.start.line, 10);
    }

    #[test]
    fn test_type_system_definitions_ignored() {
        let found = diagnostics(
            "type Extra { id: ID }\n{ user(id: 1) { id } }",
            Some(&schema()),
            &DiagnosticsOptions::default(),
        );
        assert!(found.is_empty(), "{}", messages(&found));
    }

    #[test]
    fn test_narrow_to_name() {
        let text = "fragment F on User { id }";
        let range = narrow_to_name(text, OffsetRange::new(0, text.len()));
        assert_eq!(&text[range.start..range.end], "F");

        let text = "...Spread";
        let range = narrow_to_name(text, OffsetRange::new(0, text.len()));
        assert_eq!(&text[range.start..range.end], "Spread");

        let text = "$id: ID";
        let range = narrow_to_name(text, OffsetRange::new(0, text.len()));
        assert_eq!(&text[range.start..range.end], "$id");

        let text = "{ a }";
        let range = narrow_to_name(text, OffsetRange::new(0, text.len()));
        assert_eq!(range, OffsetRange::new(0, 5));
    }
}
