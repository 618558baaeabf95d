//! Go-to-definition for fragment spreads, operation and fragment names,
//! named types, and fields and arguments.

use std::path::Path;

use apollo_compiler::Schema;
use apollo_parser::cst::{self, CstNode};
use apollo_parser::Parser;
use graphql_online_parser::token_at_position;
use graphql_types::{LineIndex, OffsetRange, Position};

use crate::type_info::type_info;
use crate::types::{Definition, DefinitionQueryResult, FragmentInfo, ObjectTypeInfo};

/// Project data that definitions are looked up in.
#[derive(Default, Clone, Copy)]
pub struct DefinitionSources<'a> {
    /// Schema used to recover the parent type of fields and arguments.
    pub schema: Option<&'a Schema>,
    /// Fragments from other files that the document spreads.
    pub fragments: &'a [FragmentInfo],
    /// Type definitions the document refers to by name.
    pub object_types: &'a [ObjectTypeInfo],
    /// Every type definition of the project. Field and argument definitions
    /// are searched here, since their parent types rarely appear in the
    /// document.
    pub schema_types: &'a [ObjectTypeInfo],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    FragmentSpread,
    Operation,
    Fragment,
    NamedType,
    Field,
    Argument,
}

/// The node under the cursor that can be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    kind: TargetKind,
    name: String,
    node: OffsetRange,
}

/// A definition found in some source text.
struct Site {
    name: OffsetRange,
    node: OffsetRange,
}

/// Resolve the symbol at `position` in `text`, a document stored at `path`.
///
/// Fragment spreads resolve to fragments of the same document first and
/// then to the external fragments. Named types resolve through the object
/// types. Operation and fragment names resolve to their own definition.
/// Fields and arguments resolve to their declaration in the SDL of the
/// parent type, which needs a schema.
#[must_use]
pub fn definition(
    text: &str,
    path: &Path,
    position: Position,
    sources: &DefinitionSources<'_>,
) -> Option<DefinitionQueryResult> {
    let line_index = LineIndex::new(text);
    let offset = line_index.offset(position)?;
    let tree = Parser::new(text).parse();
    let target = find_target(&tree.document(), offset)?;
    tracing::trace!(name = %target.name, kind = ?target.kind, "definition target");

    let definitions = match target.kind {
        TargetKind::Operation | TargetKind::Fragment => {
            resolve_in(text, path, target.kind, &target.name)
        }
        TargetKind::FragmentSpread => {
            let local = resolve_in(text, path, TargetKind::Fragment, &target.name);
            if local.is_empty() {
                sources
                    .fragments
                    .iter()
                    .filter(|fragment| fragment.name() == target.name)
                    .flat_map(|fragment| {
                        resolve_in(
                            &fragment.content,
                            &fragment.file_path,
                            TargetKind::Fragment,
                            &target.name,
                        )
                    })
                    .collect()
            } else {
                local
            }
        }
        TargetKind::NamedType => sources
            .object_types
            .iter()
            .filter(|info| info.name() == Some(target.name.as_str()))
            .flat_map(|info| {
                resolve_in(&info.content, &info.file_path, TargetKind::NamedType, &target.name)
            })
            .collect(),
        TargetKind::Field | TargetKind::Argument => {
            let schema = sources.schema?;
            member_definitions(schema, text, position, target.kind, sources.schema_types)
        }
    };

    if definitions.is_empty() {
        return None;
    }
    Some(DefinitionQueryResult {
        definitions,
        query_range: line_index.range(target.node),
    })
}

fn resolve_in(text: &str, path: &Path, kind: TargetKind, name: &str) -> Vec<Definition> {
    let line_index = LineIndex::new(text);
    definition_sites(text, kind, name)
        .into_iter()
        .map(|site| Definition {
            path: path.to_path_buf(),
            position: line_index.position(site.name.start),
            range: line_index.range(site.node),
            name: name.to_string(),
        })
        .collect()
}

/// Declarations of the field or argument at `position`, looked up in the
/// definitions of the parent type that the online parser recovers there.
fn member_definitions(
    schema: &Schema,
    text: &str,
    position: Position,
    kind: TargetKind,
    types: &[ObjectTypeInfo],
) -> Vec<Definition> {
    let token = token_at_position(text, position);
    let info = type_info(schema, &token.state);
    let (Some(parent), Some(field)) = (info.parent_type.as_ref(), info.field_def.as_ref()) else {
        return Vec::new();
    };
    let argument = match (kind, info.arg_def.as_ref()) {
        (TargetKind::Argument, Some(argument)) => Some(argument.name.as_str()),
        (TargetKind::Argument, None) => return Vec::new(),
        _ => None,
    };
    tracing::trace!(%parent, field = %field.name, ?argument, "member definition");

    types
        .iter()
        .filter(|ty| ty.name() == Some(parent.as_str()))
        .flat_map(|ty| {
            let line_index = LineIndex::new(&ty.content);
            member_sites(&ty.content, parent.as_str(), field.name.as_str(), argument)
                .into_iter()
                .map(move |(name, site)| Definition {
                    path: ty.file_path.clone(),
                    position: line_index.position(site.name.start),
                    range: line_index.range(site.node),
                    name,
                })
        })
        .collect()
}

fn member_sites(
    text: &str,
    parent: &str,
    field: &str,
    argument: Option<&str>,
) -> Vec<(String, Site)> {
    let tree = Parser::new(text).parse();
    let mut sites = Vec::new();

    for definition in tree.document().definitions() {
        let (name, fields) = match &definition {
            cst::Definition::ObjectTypeDefinition(def) => (def.name(), def.fields_definition()),
            cst::Definition::InterfaceTypeDefinition(def) => {
                (def.name(), def.fields_definition())
            }
            _ => continue,
        };
        if name.is_none_or(|name| name.text().as_str() != parent) {
            continue;
        }
        let Some(fields) = fields else {
            continue;
        };

        for field_def in fields.field_definitions() {
            let Some(field_name) = field_def.name().filter(|name| name.text().as_str() == field)
            else {
                continue;
            };
            let Some(argument) = argument else {
                sites.push((
                    field.to_string(),
                    Site {
                        name: name_range(&field_name),
                        node: node_range(&field_def),
                    },
                ));
                continue;
            };
            let arguments = field_def
                .arguments_definition()
                .into_iter()
                .flat_map(|arguments| arguments.input_value_definitions());
            for input in arguments {
                if let Some(input_name) =
                    input.name().filter(|name| name.text().as_str() == argument)
                {
                    sites.push((
                        argument.to_string(),
                        Site {
                            name: name_range(&input_name),
                            node: node_range(&input),
                        },
                    ));
                }
            }
        }
    }

    sites
}

fn definition_sites(text: &str, kind: TargetKind, name: &str) -> Vec<Site> {
    let tree = Parser::new(text).parse();
    let mut sites = Vec::new();

    for definition in tree.document().definitions() {
        let (defined, node) = match (&definition, kind) {
            (cst::Definition::OperationDefinition(operation), TargetKind::Operation) => {
                (operation.name(), node_range(operation))
            }
            (cst::Definition::FragmentDefinition(fragment), TargetKind::Fragment) => (
                fragment.fragment_name().and_then(|name| name.name()),
                node_range(fragment),
            ),
            (_, TargetKind::NamedType) => (type_definition_name(&definition), node_range(&definition)),
            _ => continue,
        };
        if let Some(defined) = defined.filter(|defined| defined.text().as_str() == name) {
            sites.push(Site {
                name: name_range(&defined),
                node,
            });
        }
    }

    sites
}

fn type_definition_name(definition: &cst::Definition) -> Option<cst::Name> {
    match definition {
        cst::Definition::ObjectTypeDefinition(def) => def.name(),
        cst::Definition::InterfaceTypeDefinition(def) => def.name(),
        cst::Definition::UnionTypeDefinition(def) => def.name(),
        cst::Definition::EnumTypeDefinition(def) => def.name(),
        cst::Definition::InputObjectTypeDefinition(def) => def.name(),
        cst::Definition::ScalarTypeDefinition(def) => def.name(),
        _ => None,
    }
}

fn find_target(document: &cst::Document, offset: usize) -> Option<Target> {
    for definition in document.definitions() {
        let found = match &definition {
            cst::Definition::OperationDefinition(operation) => check_operation(operation, offset),
            cst::Definition::FragmentDefinition(fragment) => check_fragment(fragment, offset),
            _ => None,
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn check_operation(operation: &cst::OperationDefinition, offset: usize) -> Option<Target> {
    if let Some(name) = operation.name().filter(|name| touches(name, offset)) {
        return Some(target(TargetKind::Operation, &name, name_range(&name)));
    }

    if let Some(variables) = operation.variable_definitions() {
        for variable in variables.variable_definitions() {
            if let Some(found) = variable.ty().and_then(|ty| check_type(&ty, offset)) {
                return Some(found);
            }
        }
    }

    operation
        .selection_set()
        .and_then(|selection_set| check_selection_set(&selection_set, offset))
}

fn check_fragment(fragment: &cst::FragmentDefinition, offset: usize) -> Option<Target> {
    if let Some(name) = fragment
        .fragment_name()
        .and_then(|name| name.name())
        .filter(|name| touches(name, offset))
    {
        return Some(target(TargetKind::Fragment, &name, name_range(&name)));
    }

    if let Some(found) = fragment
        .type_condition()
        .and_then(|condition| condition.named_type())
        .and_then(|named| check_named_type(&named, offset))
    {
        return Some(found);
    }

    fragment
        .selection_set()
        .and_then(|selection_set| check_selection_set(&selection_set, offset))
}

fn check_selection_set(selection_set: &cst::SelectionSet, offset: usize) -> Option<Target> {
    for selection in selection_set.selections() {
        let found = match selection {
            cst::Selection::Field(field) => check_field(&field, offset),
            cst::Selection::FragmentSpread(spread) => spread
                .fragment_name()
                .and_then(|name| name.name())
                .filter(|name| touches(name, offset))
                .map(|name| target(TargetKind::FragmentSpread, &name, node_range(&spread))),
            cst::Selection::InlineFragment(inline) => inline
                .type_condition()
                .and_then(|condition| condition.named_type())
                .and_then(|named| check_named_type(&named, offset))
                .or_else(|| {
                    inline
                        .selection_set()
                        .and_then(|nested| check_selection_set(&nested, offset))
                }),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

fn check_field(field: &cst::Field, offset: usize) -> Option<Target> {
    if let Some(name) = field.name().filter(|name| touches(name, offset)) {
        return Some(target(TargetKind::Field, &name, name_range(&name)));
    }

    if let Some(arguments) = field.arguments() {
        for argument in arguments.arguments() {
            if let Some(name) = argument.name().filter(|name| touches(name, offset)) {
                return Some(target(TargetKind::Argument, &name, name_range(&name)));
            }
        }
    }

    field
        .selection_set()
        .and_then(|nested| check_selection_set(&nested, offset))
}

fn check_type(ty: &cst::Type, offset: usize) -> Option<Target> {
    match ty {
        cst::Type::NamedType(named) => check_named_type(named, offset),
        cst::Type::ListType(list) => list.ty().and_then(|inner| check_type(&inner, offset)),
        cst::Type::NonNullType(non_null) => non_null
            .named_type()
            .and_then(|named| check_named_type(&named, offset))
            .or_else(|| {
                non_null
                    .list_type()
                    .and_then(|list| list.ty())
                    .and_then(|inner| check_type(&inner, offset))
            }),
    }
}

fn check_named_type(named: &cst::NamedType, offset: usize) -> Option<Target> {
    let name = named.name().filter(|name| touches(name, offset))?;
    Some(target(TargetKind::NamedType, &name, name_range(&name)))
}

fn target(kind: TargetKind, name: &cst::Name, node: OffsetRange) -> Target {
    Target {
        kind,
        name: name.text().to_string(),
        node,
    }
}

/// Whether the cursor is on the name, counting the position just past its
/// last character.
fn touches(name: &cst::Name, offset: usize) -> bool {
    let range = name_range(name);
    offset >= range.start && offset <= range.end
}

pub(crate) fn name_range(name: &cst::Name) -> OffsetRange {
    let start: usize = name.syntax().text_range().start().into();
    OffsetRange::new(start, start + name.text().as_str().len())
}

/// Range of a node without the trailing ignored tokens the parser attaches.
pub(crate) fn node_range<T: CstNode>(node: &T) -> OffsetRange {
    let start: usize = node.syntax().text_range().start().into();
    let text = node.syntax().to_string();
    let trimmed = text.trim_end_matches(|ch: char| ch.is_whitespace() || ch == ',');
    OffsetRange::new(start, start + trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_compiler::ast;
    use graphql_test_utils::assertions::format_range;
    use graphql_test_utils::extract_cursor;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn fragment_info(path: &str, source: &str) -> FragmentInfo {
        let document = ast::Document::parse(source, path).unwrap();
        let definition = document
            .definitions
            .iter()
            .find_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => Some(fragment.clone()),
                _ => None,
            })
            .unwrap();
        FragmentInfo {
            file_path: PathBuf::from(path),
            content: Arc::from(source),
            definition,
        }
    }

    fn object_type_info(path: &str, source: &str) -> ObjectTypeInfo {
        let document = ast::Document::parse(source, path).unwrap();
        ObjectTypeInfo {
            file_path: PathBuf::from(path),
            content: Arc::from(source),
            definition: document.definitions[0].clone(),
        }
    }

    fn resolve(
        source: &str,
        fragments: &[FragmentInfo],
        object_types: &[ObjectTypeInfo],
    ) -> Option<DefinitionQueryResult> {
        let (text, position) = extract_cursor(source);
        let sources = DefinitionSources {
            fragments,
            object_types,
            ..DefinitionSources::default()
        };
        definition(&text, Path::new("query.graphql"), position, &sources)
    }

    const SDL: &str = "type Query {\n  user(id: ID!, first: Int): User\n}\n\ntype User {\n  id: ID!\n  name: String\n}\n";

    fn resolve_member(source: &str) -> Option<DefinitionQueryResult> {
        let schema = Schema::parse_and_validate(SDL, "schema.graphql").unwrap();
        let document = ast::Document::parse(SDL, "schema.graphql").unwrap();
        let types: Vec<_> = document
            .definitions
            .iter()
            .map(|definition| ObjectTypeInfo {
                file_path: PathBuf::from("schema.graphql"),
                content: Arc::from(SDL),
                definition: definition.clone(),
            })
            .collect();
        let (text, position) = extract_cursor(source);
        let sources = DefinitionSources {
            schema: Some(&*schema),
            schema_types: &types,
            ..DefinitionSources::default()
        };
        definition(&text, Path::new("query.graphql"), position, &sources)
    }

    #[test]
    fn test_fragment_spread_in_other_file() {
        let fragments = [fragment_info(
            "fragments.graphql",
            "fragment UserFields on User {\n  id\n}\n",
        )];
        let result = resolve("{ user { ...UserFi*elds } }", &fragments, &[]).unwrap();

        assert_eq!(format_range(result.query_range), "0:9-0:22");
        assert_eq!(result.definitions.len(), 1);
        let found = &result.definitions[0];
        assert_eq!(found.path, PathBuf::from("fragments.graphql"));
        assert_eq!(found.name, "UserFields");
        assert_eq!(found.position, graphql_types::Position::new(0, 9));
        assert_eq!(format_range(found.range), "0:0-2:1");
    }

    #[test]
    fn test_local_fragment_wins() {
        let fragments = [fragment_info("other.graphql", "fragment F on User { id }")];
        let result = resolve(
            "{ user { ...F* } }\nfragment F on User { name }",
            &fragments,
            &[],
        )
        .unwrap();
        assert_eq!(result.definitions.len(), 1);
        assert_eq!(result.definitions[0].path, PathBuf::from("query.graphql"));
        assert_eq!(
            result.definitions[0].position,
            graphql_types::Position::new(1, 9)
        );
    }

    #[test]
    fn test_operation_name_resolves_to_itself() {
        let result = resolve("query Get*User { user { id } }", &[], &[]).unwrap();
        assert_eq!(result.definitions[0].name, "GetUser");
        assert_eq!(format_range(result.definitions[0].range), "0:0-0:29");
        assert_eq!(format_range(result.query_range), "0:6-0:13");
    }

    #[test]
    fn test_named_type_through_object_types() {
        let types = [object_type_info(
            "schema.graphql",
            "type User {\n  id: ID\n}\n",
        )];
        let result = resolve("fragment F on Us*er { id }", &[], &types).unwrap();
        assert_eq!(result.definitions[0].path, PathBuf::from("schema.graphql"));
        assert_eq!(format_range(result.definitions[0].range), "0:0-2:1");

        let result = resolve("query Q($u: [User*!]) { a }", &[], &types).unwrap();
        assert_eq!(result.definitions[0].name, "User");
    }

    #[test]
    fn test_field_resolves_to_parent_type_sdl() {
        let result = resolve_member("{ user(id: 1) { na*me } }").unwrap();
        assert_eq!(format_range(result.query_range), "0:16-0:20");
        assert_eq!(result.definitions.len(), 1);
        let found = &result.definitions[0];
        assert_eq!(found.path, PathBuf::from("schema.graphql"));
        assert_eq!(found.name, "name");
        assert_eq!(found.position, graphql_types::Position::new(6, 2));
        assert_eq!(format_range(found.range), "6:2-6:14");

        let result = resolve_member("{ us*er(id: 1) { id } }").unwrap();
        assert_eq!(result.definitions[0].name, "user");
        assert_eq!(format_range(result.definitions[0].range), "1:2-1:33");
    }

    #[test]
    fn test_argument_resolves_to_input_value() {
        let result = resolve_member("{ user(fir*st: 1) { id } }").unwrap();
        assert_eq!(format_range(result.query_range), "0:7-0:12");
        let found = &result.definitions[0];
        assert_eq!(found.name, "first");
        assert_eq!(found.position, graphql_types::Position::new(1, 16));
        assert_eq!(format_range(found.range), "1:16-1:26");
    }

    #[test]
    fn test_member_without_schema_or_sdl() {
        assert!(resolve("{ user(fir*st: 1) { id } }", &[], &[]).is_none());
        assert!(resolve_member("{ user(id: 1) { __type*name } }").is_none());
        assert!(resolve_member("{ user(nope*: 1) { id } }").is_none());
    }

    #[test]
    fn test_unresolved() {
        assert!(resolve("{ user { ...Miss*ing } }", &[], &[]).is_none());
        assert!(resolve("{ us*er { id } }", &[], &[]).is_none());
    }
}
