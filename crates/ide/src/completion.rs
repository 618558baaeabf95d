//! Completion feature implementation.
//!
//! The online parser tells us which grammar rule the cursor is in, and the
//! type-info resolver tells us where in the schema that rule sits. The pair
//! picks the candidate list:
//! - statement keywords at the document level
//! - field names in selection sets
//! - argument and input-object field names
//! - enum values, booleans and variables in value positions
//! - type names in type conditions, variable definitions and SDL
//! - fragment names after `...`
//! - directives valid at the enclosing location

use std::collections::HashSet;
use std::ops::ControlFlow;

use apollo_compiler::ast::{self, DirectiveLocation, OperationType};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node, Schema};
use graphql_online_parser::{
    run_online_parser, token_at_position, ContextToken, Frame, RuleKind, State,
};
use graphql_types::Position;

use crate::hint::hint_list;
use crate::mode::{document_mode, DocumentMode};
use crate::schema_utils::{self, deprecation_reason};
use crate::type_info::{definition_frame, type_info, TypeInfo};
use crate::types::{CompletionItem, CompletionKind, FragmentInfo};

/// Caller-supplied context for [`autocomplete_suggestions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionOptions<'a> {
    /// URI of the document; `.graphqls` forces SDL keywords.
    pub uri: Option<&'a str>,
    /// Overrides the mode detected from the text.
    pub mode: Option<DocumentMode>,
    /// Fragments defined elsewhere in the project.
    pub external_fragments: &'a [FragmentInfo],
}

const TYPE_SYSTEM_KEYWORDS: &[&str] = &[
    "type",
    "interface",
    "union",
    "input",
    "scalar",
    "schema",
    "enum",
    "directive",
];
const EXECUTABLE_KEYWORDS: &[&str] = &["query", "mutation", "subscription", "fragment", "{"];

/// Completion candidates for the cursor at `position` in `text`.
pub fn autocomplete_suggestions(
    schema: &Schema,
    text: &str,
    position: Position,
    options: &CompletionOptions<'_>,
) -> Vec<CompletionItem> {
    let token = token_at_position(text, position);
    let state = token.context_state();
    let info = type_info(schema, &token.state);

    let Some(kind) = state.kind() else {
        return Vec::new();
    };
    let step = state.step();
    let prev_kind = state.ancestor(1).map(|frame| frame.kind);
    let typed = token.string.as_str();

    tracing::trace!(?kind, step, ?prev_kind, typed, "completion context");

    match kind {
        RuleKind::Document => {
            let mode = options
                .mode
                .unwrap_or_else(|| document_mode(text, options.uri));
            return hint_list(typed, document_keywords(mode));
        }
        RuleKind::ExtendDef => {
            return hint_list(typed, keywords(TYPE_SYSTEM_KEYWORDS));
        }
        RuleKind::ScalarTypeExtension
        | RuleKind::ObjectTypeExtension
        | RuleKind::InterfaceTypeExtension
        | RuleKind::UnionTypeExtension
        | RuleKind::EnumTypeExtension
        | RuleKind::InputObjectTypeExtension
            if step == 1 =>
        {
            return hint_list(typed, extension_targets(schema, kind));
        }
        _ => {}
    }

    if kind == RuleKind::Implements
        || (kind == RuleKind::NamedType && prev_kind == Some(RuleKind::Implements))
    {
        return implements_suggestions(schema, text, &state, &info, typed);
    }

    if matches!(
        kind,
        RuleKind::SelectionSet | RuleKind::Field | RuleKind::AliasedField
    ) {
        return hint_list(typed, field_suggestions(schema, &info));
    }

    if kind == RuleKind::Arguments || (kind == RuleKind::Argument && step == 0) {
        if let Some(arg_defs) = &info.arg_defs {
            let items = arg_defs
                .iter()
                .map(|arg| {
                    CompletionItem::new(arg.name.as_str(), CompletionKind::Argument)
                        .with_detail(arg.ty.to_string())
                        .with_documentation(description(arg.description.as_ref()))
                        .with_insert_text(format!("{}: ", arg.name))
                        .with_deprecation(deprecation_reason(&arg.directives))
                })
                .collect();
            return hint_list(typed, items);
        }
    }

    if kind == RuleKind::ObjectValue || (kind == RuleKind::ObjectField && step == 0) {
        if let Some(fields) = &info.object_field_defs {
            let items = fields
                .iter()
                .map(|field| {
                    CompletionItem::new(field.name.as_str(), CompletionKind::InputField)
                        .with_detail(field.ty.to_string())
                        .with_documentation(description(field.description.as_ref()))
                        .with_insert_text(format!("{}: ", field.name))
                        .with_deprecation(deprecation_reason(&field.directives))
                })
                .collect();
            return hint_list(typed, items);
        }
    }

    if kind == RuleKind::EnumValue
        || (kind == RuleKind::ListValue && step == 1)
        || (kind == RuleKind::ObjectField && step == 2)
        || (kind == RuleKind::Argument && step == 2)
    {
        return hint_list(typed, input_value_suggestions(schema, text, &token, &info));
    }

    if kind == RuleKind::Variable && step == 1 {
        let expected = info.named_input_type();
        let items = variable_suggestions(schema, text, &token)
            .into_iter()
            .filter(|item| item.detail.as_deref() == expected.map(Name::as_str))
            .collect();
        return hint_list(typed, items);
    }

    if (kind == RuleKind::TypeCondition && step == 1)
        || (kind == RuleKind::NamedType && prev_kind == Some(RuleKind::TypeCondition))
    {
        return hint_list(typed, type_condition_suggestions(schema, &info));
    }

    if kind == RuleKind::FragmentSpread && step == 1 {
        return hint_list(
            typed,
            fragment_spread_suggestions(schema, text, &token, &info, options.external_fragments),
        );
    }

    if let Some(slot) = unwrap_type(&state) {
        if slot.kind == RuleKind::FieldDef && slot.step == 3 {
            return hint_list(typed, type_names(schema, schema_utils::is_output));
        }
        if slot.kind == RuleKind::InputValueDef && slot.step == 2 {
            return hint_list(typed, type_names(schema, schema_utils::is_input));
        }
    }

    if (kind == RuleKind::VariableDefinition && step == 2)
        || (kind == RuleKind::ListType && step == 1)
        || (kind == RuleKind::NamedType
            && matches!(
                prev_kind,
                Some(RuleKind::VariableDefinition | RuleKind::ListType | RuleKind::NonNullType)
            ))
    {
        return hint_list(typed, type_names(schema, schema_utils::is_input));
    }

    if kind == RuleKind::Directive {
        return hint_list(typed, directive_suggestions(schema, &state));
    }

    if kind == RuleKind::DirectiveDef {
        let items = state
            .name()
            .and_then(|name| schema.directive_definitions.get(name))
            .map(|directive| {
                directive
                    .arguments
                    .iter()
                    .map(|arg| {
                        CompletionItem::new(arg.name.as_str(), CompletionKind::Argument)
                            .with_documentation(description(arg.description.as_ref()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        return hint_list(typed, items);
    }

    Vec::new()
}

fn keywords(labels: &[&str]) -> Vec<CompletionItem> {
    labels
        .iter()
        .map(|label| CompletionItem::new(*label, CompletionKind::Keyword))
        .collect()
}

fn document_keywords(mode: DocumentMode) -> Vec<CompletionItem> {
    let mut items = Vec::new();
    if mode != DocumentMode::Executable {
        items.push(CompletionItem::new("extend", CompletionKind::Keyword));
    }
    if mode != DocumentMode::TypeSystem {
        items.extend(keywords(EXECUTABLE_KEYWORDS));
    }
    if mode != DocumentMode::Executable {
        items.extend(keywords(TYPE_SYSTEM_KEYWORDS));
    }
    items
}

fn description(description: Option<&Node<str>>) -> String {
    description.map(|text| text.to_string()).unwrap_or_default()
}

fn type_item(name: &Name, ty: &ExtendedType) -> CompletionItem {
    CompletionItem::new(name.as_str(), CompletionKind::Type)
        .with_documentation(schema_utils::description_of(ty).unwrap_or_default())
}

/// Every non-introspection schema type accepted by `filter`.
fn type_names(schema: &Schema, filter: fn(&ExtendedType) -> bool) -> Vec<CompletionItem> {
    schema
        .types
        .iter()
        .filter(|(name, ty)| !schema_utils::is_introspection(name) && filter(ty))
        .map(|(name, ty)| type_item(name, ty))
        .collect()
}

fn extension_targets(schema: &Schema, kind: RuleKind) -> Vec<CompletionItem> {
    let filter: fn(&ExtendedType) -> bool = match kind {
        RuleKind::ScalarTypeExtension => |ty| matches!(ty, ExtendedType::Scalar(_)),
        RuleKind::ObjectTypeExtension => |ty| matches!(ty, ExtendedType::Object(_)),
        RuleKind::InterfaceTypeExtension => |ty| matches!(ty, ExtendedType::Interface(_)),
        RuleKind::UnionTypeExtension => |ty| matches!(ty, ExtendedType::Union(_)),
        RuleKind::EnumTypeExtension => |ty| matches!(ty, ExtendedType::Enum(_)),
        RuleKind::InputObjectTypeExtension => |ty| matches!(ty, ExtendedType::InputObject(_)),
        _ => return Vec::new(),
    };
    type_names(schema, filter)
}

fn field_suggestions(schema: &Schema, info: &TypeInfo) -> Vec<CompletionItem> {
    let Some(parent) = info.parent_type.as_ref() else {
        return Vec::new();
    };

    let mut fields = schema_utils::declared_fields(schema, parent);
    let is_query_root = schema_utils::root_type(schema, OperationType::Query).as_ref() == Some(parent);
    let mut meta_fields = Vec::new();
    if is_query_root || schema_utils::is_abstract_name(schema, parent) {
        meta_fields.push("__typename");
    }
    if is_query_root {
        meta_fields.extend(["__schema", "__type"]);
    }
    fields.extend(
        meta_fields
            .into_iter()
            .filter_map(|name| schema_utils::field_def(schema, parent, name)),
    );

    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            CompletionItem::new(field.name.as_str(), CompletionKind::Field)
                .with_sort_text(format!("{index}{}", field.name))
                .with_detail(field.ty.to_string())
                .with_documentation(description(field.description.as_ref()))
                .with_deprecation(deprecation_reason(&field.directives))
        })
        .collect()
}

fn input_value_suggestions(
    schema: &Schema,
    text: &str,
    token: &ContextToken,
    info: &TypeInfo,
) -> Vec<CompletionItem> {
    let Some(input_name) = info.named_input_type() else {
        return Vec::new();
    };

    let mut variables: Vec<CompletionItem> = variable_suggestions(schema, text, token)
        .into_iter()
        .filter(|item| item.detail.as_deref() == Some(input_name.as_str()))
        .collect();

    match schema.types.get(input_name) {
        Some(ExtendedType::Enum(enum_type)) => {
            let mut items: Vec<CompletionItem> = enum_type
                .values
                .values()
                .map(|value| {
                    CompletionItem::new(value.value.as_str(), CompletionKind::EnumValue)
                        .with_detail(input_name.as_str())
                        .with_documentation(description(value.description.as_ref()))
                        .with_deprecation(deprecation_reason(&value.directives))
                })
                .collect();
            items.append(&mut variables);
            items
        }
        Some(ExtendedType::Scalar(_)) if input_name.as_str() == "Boolean" => {
            variables.push(
                CompletionItem::new("true", CompletionKind::Keyword)
                    .with_detail("Boolean")
                    .with_documentation("Not false."),
            );
            variables.push(
                CompletionItem::new("false", CompletionKind::Keyword)
                    .with_detail("Boolean")
                    .with_documentation("Not true."),
            );
            variables
        }
        _ => variables,
    }
}

/// Variables declared in `text` whose type the schema knows. `detail` holds
/// the variable's named type.
fn variable_suggestions(schema: &Schema, text: &str, token: &ContextToken) -> Vec<CompletionItem> {
    let mut seen = HashSet::new();
    let mut items = Vec::new();
    let mut pending: Option<String> = None;
    // Typing right after `$` must not insert a second one.
    let after_dollar = token.string == "$" || token.state.kind() == Some(RuleKind::Variable);

    run_online_parser(text, |_, state, _, _| {
        let in_definition = state
            .frames()
            .iter()
            .any(|frame| frame.kind == RuleKind::VariableDefinition);
        match (state.kind(), state.name()) {
            (Some(RuleKind::Variable), Some(name)) if in_definition => {
                pending = Some(name.to_string());
            }
            (Some(RuleKind::NamedType), Some(type_name)) if in_definition => {
                if let Some(variable) = pending.take() {
                    if schema.types.contains_key(type_name) && seen.insert(variable.clone()) {
                        let insert = if after_dollar {
                            variable.clone()
                        } else {
                            format!("${variable}")
                        };
                        items.push(
                            CompletionItem::new(format!("${variable}"), CompletionKind::Variable)
                                .with_detail(type_name)
                                .with_insert_text(insert),
                        );
                    }
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    });

    items
}

fn implements_suggestions(
    schema: &Schema,
    text: &str,
    state: &State,
    info: &TypeInfo,
    typed: &str,
) -> Vec<CompletionItem> {
    // An `&` is due before the next interface.
    if state.needs_separator() {
        return Vec::new();
    }

    let current = info.interface_def.as_deref().or(info.object_type_def.as_deref());

    let mut inline_interfaces = Vec::new();
    let mut listed = HashSet::new();
    run_online_parser(text, |_, state, _, _| {
        let Some(name) = state.name() else {
            return ControlFlow::Continue(());
        };
        match state.kind() {
            Some(RuleKind::InterfaceDef)
                if !schema.types.contains_key(name)
                    && !inline_interfaces.iter().any(|known| known == name) =>
            {
                inline_interfaces.push(name.to_string());
            }
            Some(RuleKind::NamedType)
                if state.ancestor(1).map(|frame| frame.kind) == Some(RuleKind::Implements)
                    && state.ancestor(2).and_then(|frame| frame.name.as_deref()) == current =>
            {
                listed.insert(name.to_string());
            }
            _ => {}
        }
        ControlFlow::Continue(())
    });
    // The interface being typed is not "already listed".
    listed.remove(typed);

    let mut items: Vec<CompletionItem> = schema
        .types
        .iter()
        .filter(|(_, ty)| matches!(ty, ExtendedType::Interface(_)))
        .map(|(name, ty)| {
            CompletionItem::new(name.as_str(), CompletionKind::Interface)
                .with_documentation(schema_utils::description_of(ty).unwrap_or_default())
        })
        .collect();
    items.extend(
        inline_interfaces
            .into_iter()
            .map(|name| CompletionItem::new(name, CompletionKind::Interface)),
    );
    items.retain(|item| Some(item.label.as_str()) != current && !listed.contains(&item.label));

    hint_list(typed, items)
}

fn type_condition_suggestions(schema: &Schema, info: &TypeInfo) -> Vec<CompletionItem> {
    let names: Vec<Name> = match info.parent_type.as_ref() {
        Some(parent) if schema_utils::is_abstract_name(schema, parent) => {
            let objects = schema_utils::possible_types(schema, parent);
            let mut interfaces: Vec<Name> = Vec::new();
            for object in &objects {
                for interface in schema_utils::interfaces_of(schema, object) {
                    if !interfaces.contains(&interface) {
                        interfaces.push(interface);
                    }
                }
            }
            objects.into_iter().chain(interfaces).collect()
        }
        Some(parent) => vec![parent.clone()],
        None => schema
            .types
            .iter()
            .filter(|(name, ty)| {
                !schema_utils::is_introspection(name) && schema_utils::is_composite(ty)
            })
            .map(|(name, _)| name.clone())
            .collect(),
    };

    names
        .iter()
        .map(|name| match schema.types.get(name) {
            Some(ty) => type_item(name, ty),
            None => CompletionItem::new(name.as_str(), CompletionKind::Type),
        })
        .collect()
}

/// Name and type condition of every fragment defined in `text`.
fn document_fragments(text: &str) -> Vec<(String, String)> {
    let mut fragments: Vec<(String, String)> = Vec::new();
    run_online_parser(text, |_, state, _, _| {
        let definition = state
            .frames()
            .iter()
            .find(|frame| frame.kind == RuleKind::FragmentDefinition);
        if let Some(Frame {
            name: Some(name),
            type_name: Some(type_name),
            ..
        }) = definition
        {
            if !fragments.iter().any(|(known, _)| known == name) {
                fragments.push((name.clone(), type_name.clone()));
            }
        }
        ControlFlow::Continue(())
    });
    fragments
}

fn fragment_spread_suggestions(
    schema: &Schema,
    text: &str,
    token: &ContextToken,
    info: &TypeInfo,
    external: &[FragmentInfo],
) -> Vec<CompletionItem> {
    let Some(parent) = info
        .parent_type
        .as_ref()
        .filter(|parent| schema_utils::is_composite_name(schema, parent))
    else {
        return Vec::new();
    };

    // A fragment may not spread itself.
    let defining = definition_frame(&token.state)
        .filter(|frame| frame.kind == RuleKind::FragmentDefinition)
        .and_then(|frame| frame.name.as_deref());

    let mut fragments = document_fragments(text);
    for fragment in external {
        if !fragments.iter().any(|(name, _)| name == fragment.name()) {
            fragments.push((
                fragment.name().to_string(),
                fragment.type_condition().to_string(),
            ));
        }
    }

    fragments
        .into_iter()
        .filter(|(name, type_condition)| {
            Some(name.as_str()) != defining
                && schema_utils::is_composite_name(schema, type_condition)
                && schema_utils::types_overlap(schema, parent, type_condition)
        })
        .map(|(name, type_condition)| {
            let documentation = format!("fragment {name} on {type_condition}");
            CompletionItem::new(name, CompletionKind::Fragment)
                .with_detail(type_condition)
                .with_documentation(documentation)
        })
        .collect()
}

fn directive_suggestions(schema: &Schema, state: &State) -> Vec<CompletionItem> {
    let Some(owner) = state.ancestor(1) else {
        return Vec::new();
    };
    let owner_parent = state.ancestor(2);

    schema
        .directive_definitions
        .values()
        .filter(|directive| can_use_directive(owner, owner_parent, directive))
        .map(|directive| {
            CompletionItem::new(directive.name.as_str(), CompletionKind::Directive)
                .with_documentation(description(directive.description.as_ref()))
        })
        .collect()
}

/// Whether `directive` may be applied to the rule `owner` (whose parent is
/// `owner_parent`).
fn can_use_directive(
    owner: &Frame,
    owner_parent: Option<&Frame>,
    directive: &ast::DirectiveDefinition,
) -> bool {
    let location = match owner.kind {
        RuleKind::Query | RuleKind::ShortQuery => DirectiveLocation::Query,
        RuleKind::Mutation => DirectiveLocation::Mutation,
        RuleKind::Subscription => DirectiveLocation::Subscription,
        RuleKind::Field | RuleKind::AliasedField => DirectiveLocation::Field,
        RuleKind::FragmentDefinition => DirectiveLocation::FragmentDefinition,
        RuleKind::FragmentSpread => DirectiveLocation::FragmentSpread,
        RuleKind::InlineFragment => DirectiveLocation::InlineFragment,
        RuleKind::VariableDefinition => DirectiveLocation::VariableDefinition,
        RuleKind::SchemaDef | RuleKind::SchemaExtension => DirectiveLocation::Schema,
        RuleKind::ScalarDef | RuleKind::ScalarTypeExtension => DirectiveLocation::Scalar,
        RuleKind::ObjectTypeDef | RuleKind::ObjectTypeExtension => DirectiveLocation::Object,
        RuleKind::FieldDef => DirectiveLocation::FieldDefinition,
        RuleKind::InterfaceDef | RuleKind::InterfaceTypeExtension => {
            DirectiveLocation::Interface
        }
        RuleKind::UnionDef | RuleKind::UnionTypeExtension => DirectiveLocation::Union,
        RuleKind::EnumDef | RuleKind::EnumTypeExtension => DirectiveLocation::Enum,
        RuleKind::EnumValue | RuleKind::EnumValueDef => DirectiveLocation::EnumValue,
        RuleKind::InputDef | RuleKind::InputObjectTypeExtension => {
            DirectiveLocation::InputObject
        }
        RuleKind::InputValueDef => match owner_parent.map(|frame| frame.kind) {
            Some(RuleKind::ArgumentsDef) => DirectiveLocation::ArgumentDefinition,
            Some(RuleKind::InputDef | RuleKind::InputObjectTypeExtension) => {
                DirectiveLocation::InputFieldDefinition
            }
            _ => return false,
        },
        _ => return false,
    };
    directive.locations.contains(&location)
}

/// The innermost frame that is not part of a type reference.
fn unwrap_type(state: &State) -> Option<&Frame> {
    state.frames().iter().rev().find(|frame| {
        !matches!(
            frame.kind,
            RuleKind::NamedType | RuleKind::ListType | RuleKind::Type | RuleKind::NonNullType
        )
    })
}
