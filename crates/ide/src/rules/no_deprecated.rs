use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::validation::Valid;
use apollo_compiler::{Node, Schema};
use apollo_parser::cst::{self, CstNode};
use graphql_types::{DiagnosticSeverity, OffsetRange};

use super::{RuleViolation, ValidationRule};
use crate::schema_utils;

/// Warns on uses of deprecated fields, arguments, input fields and enum
/// values.
pub struct NoDeprecated;

impl ValidationRule for NoDeprecated {
    fn name(&self) -> &'static str {
        "no_deprecated"
    }

    fn severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::Warning
    }

    fn source(&self) -> &'static str {
        "GraphQL: Deprecation"
    }

    fn check(&self, document: &cst::Document, schema: &Valid<Schema>) -> Vec<RuleViolation> {
        let mut walker = Walker {
            schema,
            violations: Vec::new(),
        };

        for definition in document.definitions() {
            match definition {
                cst::Definition::OperationDefinition(operation) => {
                    let kind = operation
                        .operation_type()
                        .map_or(OperationType::Query, |ty| operation_kind(&ty));
                    let root = schema_utils::root_type(schema, kind);
                    if let (Some(root), Some(selection_set)) = (root, operation.selection_set()) {
                        walker.selection_set(&selection_set, &root);
                    }
                }
                cst::Definition::FragmentDefinition(fragment) => {
                    let type_name = fragment
                        .type_condition()
                        .and_then(|condition| condition.named_type())
                        .and_then(|named| named.name())
                        .map(|name| name.text().to_string());
                    if let (Some(type_name), Some(selection_set)) =
                        (type_name, fragment.selection_set())
                    {
                        walker.selection_set(&selection_set, &type_name);
                    }
                }
                _ => {}
            }
        }

        walker.violations
    }
}

fn operation_kind(ty: &cst::OperationType) -> OperationType {
    if ty.mutation_token().is_some() {
        OperationType::Mutation
    } else if ty.subscription_token().is_some() {
        OperationType::Subscription
    } else {
        OperationType::Query
    }
}

struct Walker<'a> {
    schema: &'a Schema,
    violations: Vec<RuleViolation>,
}

impl Walker<'_> {
    fn selection_set(&mut self, selection_set: &cst::SelectionSet, parent: &str) {
        for selection in selection_set.selections() {
            match selection {
                cst::Selection::Field(field) => self.field(&field, parent),
                cst::Selection::InlineFragment(inline) => {
                    let type_name = inline
                        .type_condition()
                        .and_then(|condition| condition.named_type())
                        .and_then(|named| named.name())
                        .map(|name| name.text().to_string());
                    self.directives(inline.directives());
                    if let Some(selection_set) = inline.selection_set() {
                        self.selection_set(&selection_set, type_name.as_deref().unwrap_or(parent));
                    }
                }
                // The fragment definition is walked on its own.
                cst::Selection::FragmentSpread(spread) => self.directives(spread.directives()),
            }
        }
    }

    fn field(&mut self, field: &cst::Field, parent: &str) {
        let Some(name) = field.name() else {
            return;
        };
        let field_name = name.text().to_string();
        let Some(definition) = schema_utils::field_def(self.schema, parent, &field_name) else {
            return;
        };

        if let Some(reason) = schema_utils::deprecation_reason(&definition.directives) {
            self.report(
                format!("The field {parent}.{field_name} is deprecated. {reason}"),
                &name,
            );
        }

        if let Some(arguments) = field.arguments() {
            for argument in arguments.arguments() {
                self.argument(&argument, &definition.arguments, |arg| {
                    format!("Field \"{parent}.{field_name}\" argument \"{arg}\" is deprecated.")
                });
            }
        }
        self.directives(field.directives());

        if let Some(selection_set) = field.selection_set() {
            self.selection_set(&selection_set, definition.ty.inner_named_type());
        }
    }

    fn directives(&mut self, directives: Option<cst::Directives>) {
        let Some(directives) = directives else {
            return;
        };
        for directive in directives.directives() {
            let Some(name) = directive.name() else {
                continue;
            };
            let directive_name = name.text().to_string();
            let Some(definition) = self
                .schema
                .directive_definitions
                .get(directive_name.as_str())
                .cloned()
            else {
                continue;
            };
            if let Some(arguments) = directive.arguments() {
                for argument in arguments.arguments() {
                    self.argument(&argument, &definition.arguments, |arg| {
                        format!("Directive \"@{directive_name}\" argument \"{arg}\" is deprecated.")
                    });
                }
            }
        }
    }

    fn argument<F>(
        &mut self,
        argument: &cst::Argument,
        definitions: &[Node<ast::InputValueDefinition>],
        message: F,
    ) where
        F: Fn(&str) -> String,
    {
        let Some(name) = argument.name() else {
            return;
        };
        let arg_name = name.text().to_string();
        let Some(definition) = definitions
            .iter()
            .find(|definition| definition.name.as_str() == arg_name.as_str())
        else {
            return;
        };

        if let Some(reason) = schema_utils::deprecation_reason(&definition.directives) {
            self.report(format!("{} {reason}", message(&arg_name)), &name);
        }
        if let Some(value) = argument.value() {
            self.value(&value, &definition.ty);
        }
    }

    fn value(&mut self, value: &cst::Value, expected: &ast::Type) {
        match value {
            cst::Value::EnumValue(enum_value) => {
                let Some(name) = enum_value.name() else {
                    return;
                };
                let enum_name = expected.inner_named_type();
                let value_name = name.text().to_string();
                let deprecated = schema_utils::enum_values(self.schema, enum_name)
                    .unwrap_or_default()
                    .into_iter()
                    .find(|definition| definition.value.as_str() == value_name.as_str())
                    .and_then(|definition| schema_utils::deprecation_reason(&definition.directives));
                if let Some(reason) = deprecated {
                    self.report(
                        format!("The enum value \"{enum_name}.{value_name}\" is deprecated. {reason}"),
                        &name,
                    );
                }
            }
            cst::Value::ListValue(list) => {
                let item = schema_utils::list_item_type(expected).unwrap_or_else(|| expected.clone());
                for value in list.values() {
                    self.value(&value, &item);
                }
            }
            cst::Value::ObjectValue(object) => {
                let input_name = expected.inner_named_type();
                let fields = schema_utils::input_fields(self.schema, input_name).unwrap_or_default();
                for object_field in object.object_fields() {
                    let Some(name) = object_field.name() else {
                        continue;
                    };
                    let field_name = name.text().to_string();
                    let Some(definition) = fields
                        .iter()
                        .find(|definition| definition.name.as_str() == field_name.as_str())
                    else {
                        continue;
                    };
                    if let Some(reason) = schema_utils::deprecation_reason(&definition.directives) {
                        self.report(
                            format!(
                                "The input field {input_name}.{field_name} is deprecated. {reason}"
                            ),
                            &name,
                        );
                    }
                    if let Some(value) = object_field.value() {
                        self.value(&value, &definition.ty);
                    }
                }
            }
            _ => {}
        }
    }

    fn report(&mut self, message: String, name: &cst::Name) {
        let start: usize = name.syntax().text_range().start().into();
        let end = start + name.text().as_str().len();
        self.violations
            .push(RuleViolation::new(message, OffsetRange::new(start, end)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_parser::Parser;

    const SCHEMA: &str = r#"
        type Query {
          user(id: ID!, legacyId: ID @deprecated(reason: "Use id")): User
          oldUser: User @deprecated
          posts(status: Status, filter: PostFilter): [Post]
        }
        type User {
          id: ID!
          name: String
          username: String @deprecated(reason: "Use name")
        }
        type Post { id: ID! }
        enum Status { PUBLISHED DRAFT ARCHIVED @deprecated(reason: "Use DRAFT") }
        input PostFilter {
          status: Status
          tag: String @deprecated(reason: "Use tags")
          tags: [String]
        }
    "#;

    fn check(source: &str) -> Vec<(String, String)> {
        let schema = Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap();
        let tree = Parser::new(source).parse();
        NoDeprecated
            .check(&tree.document(), &schema)
            .into_iter()
            .flat_map(|violation| {
                let message = violation.message;
                violation
                    .ranges
                    .into_iter()
                    .map(move |range| (message.clone(), source[range.start..range.end].to_string()))
            })
            .collect()
    }

    #[test]
    fn test_deprecated_field() {
        let found = check("{ user(id: 1) { id username } }");
        assert_eq!(
            found,
            vec![(
                "The field User.username is deprecated. Use name".to_string(),
                "username".to_string()
            )]
        );
    }

    #[test]
    fn test_default_reason() {
        let found = check("{ oldUser { id } }");
        assert_eq!(
            found[0].0,
            "The field Query.oldUser is deprecated. No longer supported"
        );
    }

    #[test]
    fn test_deprecated_argument() {
        let found = check("{ user(id: 1, legacyId: 2) { id } }");
        assert_eq!(
            found,
            vec![(
                "Field \"Query.user\" argument \"legacyId\" is deprecated. Use id".to_string(),
                "legacyId".to_string()
            )]
        );
    }

    #[test]
    fn test_deprecated_enum_value_in_nested_input() {
        let found = check("{ posts(filter: { status: ARCHIVED, tag: \"x\" }) { id } }");
        let messages: Vec<_> = found.iter().map(|(message, _)| message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "The enum value \"Status.ARCHIVED\" is deprecated. Use DRAFT",
                "The input field PostFilter.tag is deprecated. Use tags",
            ]
        );
    }

    #[test]
    fn test_fragments_and_inline_fragments() {
        let found = check("fragment F on Query { ... on Query { user(id: 1) { username } } }");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, "username");
    }

    #[test]
    fn test_clean_document() {
        assert!(check("{ user(id: 1) { id name } posts(status: DRAFT) { id } }").is_empty());
    }
}
