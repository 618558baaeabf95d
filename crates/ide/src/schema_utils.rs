//! Schema lookups shared by completion, hover and type resolution.

use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node, Schema};

/// Reason reported for `@deprecated` without an explicit `reason`.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// Name of the root operation type for `operation`.
#[must_use]
pub fn root_type(schema: &Schema, operation: OperationType) -> Option<Name> {
    schema.root_operation(operation).cloned()
}

/// Resolve `name` to a type reference, provided the schema defines it.
#[must_use]
pub fn named_type(schema: &Schema, name: &str) -> Option<ast::Type> {
    schema
        .types
        .get_key_value(name)
        .map(|(name, _)| ast::Type::Named(name.clone()))
}

/// Field lookup including the `__typename`, `__schema` and `__type`
/// meta-fields.
#[must_use]
pub fn field_def(
    schema: &Schema,
    type_name: &str,
    field_name: &str,
) -> Option<Node<ast::FieldDefinition>> {
    schema
        .type_field(type_name, field_name)
        .ok()
        .map(|component| component.node.clone())
}

/// Explicitly declared fields of an object or interface type, in schema
/// order.
#[must_use]
pub fn declared_fields(schema: &Schema, type_name: &str) -> Vec<Node<ast::FieldDefinition>> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Object(object)) => object
            .fields
            .values()
            .map(|field| field.node.clone())
            .collect(),
        Some(ExtendedType::Interface(interface)) => interface
            .fields
            .values()
            .map(|field| field.node.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// Fields of an input object type, in schema order.
#[must_use]
pub fn input_fields(schema: &Schema, type_name: &str) -> Option<Vec<Node<ast::InputValueDefinition>>> {
    match schema.types.get(type_name) {
        Some(ExtendedType::InputObject(input)) => Some(
            input
                .fields
                .values()
                .map(|field| field.node.clone())
                .collect(),
        ),
        _ => None,
    }
}

#[must_use]
pub fn enum_values(schema: &Schema, type_name: &str) -> Option<Vec<Node<ast::EnumValueDefinition>>> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Enum(enum_type)) => Some(
            enum_type
                .values
                .values()
                .map(|value| value.node.clone())
                .collect(),
        ),
        _ => None,
    }
}

#[must_use]
pub fn is_composite(ty: &ExtendedType) -> bool {
    matches!(
        ty,
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_)
    )
}

#[must_use]
pub fn is_abstract(ty: &ExtendedType) -> bool {
    matches!(ty, ExtendedType::Interface(_) | ExtendedType::Union(_))
}

#[must_use]
pub fn is_input(ty: &ExtendedType) -> bool {
    matches!(
        ty,
        ExtendedType::Scalar(_) | ExtendedType::Enum(_) | ExtendedType::InputObject(_)
    )
}

#[must_use]
pub fn is_output(ty: &ExtendedType) -> bool {
    !matches!(ty, ExtendedType::InputObject(_))
}

#[must_use]
pub fn is_composite_name(schema: &Schema, name: &str) -> bool {
    schema.types.get(name).is_some_and(is_composite)
}

#[must_use]
pub fn is_abstract_name(schema: &Schema, name: &str) -> bool {
    schema.types.get(name).is_some_and(is_abstract)
}

/// Introspection types (`__Schema`, `__Type`, ...) are never suggested.
#[must_use]
pub fn is_introspection(name: &str) -> bool {
    name.starts_with("__")
}

/// Names of the interfaces an object or interface type declares.
#[must_use]
pub fn interfaces_of(schema: &Schema, type_name: &str) -> Vec<Name> {
    match schema.types.get(type_name) {
        Some(ExtendedType::Object(object)) => object
            .implements_interfaces
            .iter()
            .map(|interface| interface.name.clone())
            .collect(),
        Some(ExtendedType::Interface(interface)) => interface
            .implements_interfaces
            .iter()
            .map(|parent| parent.name.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// Object types an abstract type can resolve to, in schema order.
#[must_use]
pub fn possible_types(schema: &Schema, abstract_name: &str) -> Vec<Name> {
    match schema.types.get(abstract_name) {
        Some(ExtendedType::Union(union)) => union
            .members
            .iter()
            .map(|member| member.name.clone())
            .collect(),
        Some(ExtendedType::Interface(_)) => schema
            .types
            .iter()
            .filter_map(|(name, ty)| match ty {
                ExtendedType::Object(object)
                    if object
                        .implements_interfaces
                        .iter()
                        .any(|interface| interface.name == abstract_name) =>
                {
                    Some(name.clone())
                }
                _ => None,
            })
            .collect(),
        Some(ExtendedType::Object(_)) => schema
            .types
            .get_key_value(abstract_name)
            .map(|(name, _)| vec![name.clone()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn is_possible_type(schema: &Schema, abstract_name: &str, object_name: &str) -> bool {
    possible_types(schema, abstract_name)
        .iter()
        .any(|name| name == object_name)
}

/// Whether a selection on `a` can ever apply to a value of type `b`.
#[must_use]
pub fn types_overlap(schema: &Schema, a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    match (is_abstract_name(schema, a), is_abstract_name(schema, b)) {
        (true, true) => possible_types(schema, a)
            .iter()
            .any(|name| is_possible_type(schema, b, name)),
        (true, false) => is_possible_type(schema, a, b),
        (false, true) => is_possible_type(schema, b, a),
        (false, false) => false,
    }
}

/// Reason of a `@deprecated` directive, if present.
#[must_use]
pub fn deprecation_reason(directives: &ast::DirectiveList) -> Option<String> {
    directives.get("deprecated").map(|directive| {
        directive
            .specified_argument_by_name("reason")
            .and_then(|value| value.as_str())
            .unwrap_or(DEFAULT_DEPRECATION_REASON)
            .to_string()
    })
}

#[must_use]
pub fn description_of(ty: &ExtendedType) -> Option<String> {
    let description = match ty {
        ExtendedType::Scalar(scalar) => scalar.description.as_ref(),
        ExtendedType::Object(object) => object.description.as_ref(),
        ExtendedType::Interface(interface) => interface.description.as_ref(),
        ExtendedType::Union(union) => union.description.as_ref(),
        ExtendedType::Enum(enum_type) => enum_type.description.as_ref(),
        ExtendedType::InputObject(input) => input.description.as_ref(),
    };
    description.map(|description| description.to_string())
}

/// Unwrap list and non-null wrappers one level, if `ty` is a list.
#[must_use]
pub fn list_item_type(ty: &ast::Type) -> Option<ast::Type> {
    match ty {
        ast::Type::List(inner) | ast::Type::NonNullList(inner) => Some(inner.as_ref().clone()),
        ast::Type::Named(_) | ast::Type::NonNullNamed(_) => None,
    }
}
