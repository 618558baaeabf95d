//! Transitive fragment and type dependencies of a document.

use std::collections::{HashMap, HashSet, VecDeque};

use apollo_compiler::ast;
use graphql_ide::{FragmentInfo, ObjectTypeInfo};

/// Fragments `document` needs from `index`, including those reached only
/// through other fragments.
///
/// Fragments the document defines itself are never returned. Every
/// fragment appears at most once, so spread cycles terminate. Names missing
/// from `index` are left out.
#[must_use]
pub fn fragment_dependencies_for_ast(
    document: &ast::Document,
    index: &HashMap<String, FragmentInfo>,
) -> Vec<FragmentInfo> {
    let local: HashSet<&str> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::FragmentDefinition(fragment) => Some(fragment.name.as_str()),
            _ => None,
        })
        .collect();

    let mut spreads = Vec::new();
    for definition in &document.definitions {
        match definition {
            ast::Definition::OperationDefinition(operation) => {
                collect_spreads(&operation.selection_set, &mut spreads);
            }
            ast::Definition::FragmentDefinition(fragment) => {
                collect_spreads(&fragment.selection_set, &mut spreads);
            }
            _ => {}
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = VecDeque::new();
    let enqueue = |name: String, seen: &mut HashSet<String>, queue: &mut VecDeque<String>| {
        if !local.contains(name.as_str()) && seen.insert(name.clone()) {
            queue.push_back(name);
        }
    };
    for name in spreads {
        enqueue(name, &mut seen, &mut queue);
    }

    let mut found = Vec::new();
    while let Some(name) = queue.pop_front() {
        let Some(info) = index.get(&name) else {
            tracing::trace!(fragment = %name, "unresolved fragment spread");
            continue;
        };
        let mut nested = Vec::new();
        collect_spreads(&info.definition.selection_set, &mut nested);
        for name in nested {
            enqueue(name, &mut seen, &mut queue);
        }
        found.push(info.clone());
    }
    found
}

fn collect_spreads(selections: &[ast::Selection], out: &mut Vec<String>) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => collect_spreads(&field.selection_set, out),
            ast::Selection::FragmentSpread(spread) => out.push(spread.fragment_name.to_string()),
            ast::Selection::InlineFragment(inline) => collect_spreads(&inline.selection_set, out),
        }
    }
}

/// Type definitions `document` refers to, followed transitively through
/// the fields of each definition found.
///
/// Types the document defines itself are skipped, as are built-in scalars
/// and anything missing from `index`.
#[must_use]
pub fn object_type_dependencies_for_ast(
    document: &ast::Document,
    index: &HashMap<String, ObjectTypeInfo>,
) -> Vec<ObjectTypeInfo> {
    let local: HashSet<&str> = document
        .definitions
        .iter()
        .filter(|definition| {
            matches!(
                definition,
                ast::Definition::ObjectTypeDefinition(_)
                    | ast::Definition::InterfaceTypeDefinition(_)
                    | ast::Definition::UnionTypeDefinition(_)
                    | ast::Definition::InputObjectTypeDefinition(_)
                    | ast::Definition::EnumTypeDefinition(_)
                    | ast::Definition::ScalarTypeDefinition(_)
            )
        })
        .filter_map(|definition| definition.name().map(apollo_compiler::Name::as_str))
        .collect();

    let mut referenced = Vec::new();
    for definition in &document.definitions {
        collect_type_references(definition, &mut referenced);
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = referenced
        .into_iter()
        .filter(|name| !local.contains(name.as_str()) && seen.insert(name.clone()))
        .collect();

    let mut found = Vec::new();
    while let Some(name) = queue.pop_front() {
        let Some(info) = index.get(&name) else {
            continue;
        };
        let mut nested = Vec::new();
        collect_type_references(&info.definition, &mut nested);
        queue.extend(
            nested
                .into_iter()
                .filter(|name| !local.contains(name.as_str()) && seen.insert(name.clone())),
        );
        found.push(info.clone());
    }
    found
}

fn collect_type_references(definition: &ast::Definition, out: &mut Vec<String>) {
    match definition {
        ast::Definition::OperationDefinition(operation) => {
            for variable in &operation.variables {
                out.push(variable.ty.inner_named_type().to_string());
            }
            collect_selection_types(&operation.selection_set, out);
        }
        ast::Definition::FragmentDefinition(fragment) => {
            out.push(fragment.type_condition.to_string());
            collect_selection_types(&fragment.selection_set, out);
        }
        ast::Definition::ObjectTypeDefinition(object) => {
            collect_fields(&object.fields, out);
            out.extend(object.implements_interfaces.iter().map(ToString::to_string));
        }
        ast::Definition::ObjectTypeExtension(object) => {
            collect_fields(&object.fields, out);
            out.extend(object.implements_interfaces.iter().map(ToString::to_string));
        }
        ast::Definition::InterfaceTypeDefinition(interface) => {
            collect_fields(&interface.fields, out);
            out.extend(interface.implements_interfaces.iter().map(ToString::to_string));
        }
        ast::Definition::InterfaceTypeExtension(interface) => {
            collect_fields(&interface.fields, out);
            out.extend(interface.implements_interfaces.iter().map(ToString::to_string));
        }
        ast::Definition::UnionTypeDefinition(union_) => {
            out.extend(union_.members.iter().map(ToString::to_string));
        }
        ast::Definition::UnionTypeExtension(union_) => {
            out.extend(union_.members.iter().map(ToString::to_string));
        }
        ast::Definition::InputObjectTypeDefinition(input) => {
            collect_input_values(&input.fields, out);
        }
        ast::Definition::InputObjectTypeExtension(input) => {
            collect_input_values(&input.fields, out);
        }
        ast::Definition::DirectiveDefinition(directive) => {
            collect_input_values(&directive.arguments, out);
        }
        _ => {}
    }
}

fn collect_fields(fields: &[apollo_compiler::Node<ast::FieldDefinition>], out: &mut Vec<String>) {
    for field in fields {
        out.push(field.ty.inner_named_type().to_string());
        collect_input_values(&field.arguments, out);
    }
}

fn collect_input_values(
    values: &[apollo_compiler::Node<ast::InputValueDefinition>],
    out: &mut Vec<String>,
) {
    out.extend(values.iter().map(|value| value.ty.inner_named_type().to_string()));
}

fn collect_selection_types(selections: &[ast::Selection], out: &mut Vec<String>) {
    for selection in selections {
        match selection {
            ast::Selection::Field(field) => collect_selection_types(&field.selection_set, out),
            ast::Selection::FragmentSpread(_) => {}
            ast::Selection::InlineFragment(inline) => {
                if let Some(condition) = &inline.type_condition {
                    out.push(condition.to_string());
                }
                collect_selection_types(&inline.selection_set, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn parse(text: &str) -> ast::Document {
        ast::Document::parse(text, "doc.graphql").unwrap()
    }

    fn fragment_index(text: &str) -> HashMap<String, FragmentInfo> {
        let content: Arc<str> = Arc::from(text);
        parse(text)
            .definitions
            .into_iter()
            .filter_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => Some((
                    fragment.name.to_string(),
                    FragmentInfo {
                        file_path: PathBuf::from("fragments.graphql"),
                        content: Arc::clone(&content),
                        definition: fragment,
                    },
                )),
                _ => None,
            })
            .collect()
    }

    fn names(fragments: &[FragmentInfo]) -> Vec<&str> {
        fragments.iter().map(FragmentInfo::name).collect()
    }

    #[test]
    fn test_transitive_fragments() {
        let index = fragment_index(
            "fragment A on User { id ...B }
             fragment B on User { ... on User { ...C } }
             fragment C on User { name }
             fragment Unused on User { id }",
        );
        let document = parse("{ me { ...A } }");
        assert_eq!(
            names(&fragment_dependencies_for_ast(&document, &index)),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_cycle_resolves_each_fragment_once() {
        let index = fragment_index(
            "fragment A on User { id ...B }
             fragment B on User { name ...A }",
        );
        let document = parse("{ me { ...A ...B } }");
        assert_eq!(
            names(&fragment_dependencies_for_ast(&document, &index)),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_local_and_unknown_fragments_are_skipped() {
        let index = fragment_index("fragment A on User { id } fragment B on User { id }");
        let document = parse("{ me { ...A ...Missing } } fragment A on User { name ...B }");
        assert_eq!(
            names(&fragment_dependencies_for_ast(&document, &index)),
            vec!["B"]
        );
    }

    #[test]
    fn test_object_type_dependencies() {
        let schema = "type User { id: ID posts(filter: PostFilter): [Post!]! }
                      type Post { author: User }
                      input PostFilter { status: Status }
                      enum Status { DRAFT }
                      type Unrelated { id: ID }";
        let content: Arc<str> = Arc::from(schema);
        let index: HashMap<_, _> = parse(schema)
            .definitions
            .into_iter()
            .filter_map(|definition| {
                let name = definition.name()?.to_string();
                Some((
                    name,
                    ObjectTypeInfo {
                        file_path: PathBuf::from("schema.graphql"),
                        content: Arc::clone(&content),
                        definition,
                    },
                ))
            })
            .collect();

        let document = parse("fragment F on User { id }");
        let mut found: Vec<_> = object_type_dependencies_for_ast(&document, &index)
            .iter()
            .filter_map(|info| info.name().map(ToString::to_string))
            .collect();
        found.sort();
        assert_eq!(found, vec!["Post", "PostFilter", "Status", "User"]);
    }
}
