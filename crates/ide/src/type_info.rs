//! Type context recovered from an online-parser state.
//!
//! The parser state is a stack of rule frames. Replaying it from the
//! document root towards the cursor against a schema tells us which type the
//! cursor sits in, which field or directive owns the surrounding arguments,
//! and which input type a value position expects.

use apollo_compiler::ast::{self, OperationType};
use apollo_compiler::{Name, Node, Schema};
use graphql_online_parser::{Frame, RuleKind, State};

use crate::schema_utils;

/// Everything known about the schema position of a parser state.
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    /// Type of the innermost field, fragment or named type reference.
    pub ty: Option<ast::Type>,
    /// Named type whose selection set encloses the cursor.
    pub parent_type: Option<Name>,
    pub field_def: Option<Node<ast::FieldDefinition>>,
    pub arg_defs: Option<Vec<Node<ast::InputValueDefinition>>>,
    pub arg_def: Option<Node<ast::InputValueDefinition>>,
    pub directive_def: Option<Node<ast::DirectiveDefinition>>,
    /// Input type expected at the current value position.
    pub input_type: Option<ast::Type>,
    pub enum_value: Option<Node<ast::EnumValueDefinition>>,
    /// Fields of the input object being written.
    pub object_field_defs: Option<Vec<Node<ast::InputValueDefinition>>>,
    /// Input object field the cursor sits in.
    pub input_field_def: Option<Node<ast::InputValueDefinition>>,
    /// Name of the interface definition being written, in SDL.
    pub interface_def: Option<String>,
    /// Name of the object type definition being written, in SDL.
    pub object_type_def: Option<String>,
}

impl TypeInfo {
    /// Named type of [`TypeInfo::input_type`].
    #[must_use]
    pub fn named_input_type(&self) -> Option<&Name> {
        self.input_type.as_ref().map(ast::Type::inner_named_type)
    }
}

/// Resolve the type context of `state` against `schema`.
#[must_use]
pub fn type_info(schema: &Schema, state: &State) -> TypeInfo {
    let mut info = TypeInfo::default();
    let frames = state.frames();

    for (index, frame) in frames.iter().enumerate() {
        let prev = index.checked_sub(1).and_then(|prev| frames.get(prev));
        visit(schema, &mut info, frame, prev);
    }

    info
}

fn visit(schema: &Schema, info: &mut TypeInfo, frame: &Frame, prev: Option<&Frame>) {
    let name = frame.name.as_deref();
    match frame.kind {
        RuleKind::Query | RuleKind::ShortQuery => {
            info.ty = root(schema, OperationType::Query);
        }
        RuleKind::Mutation => info.ty = root(schema, OperationType::Mutation),
        RuleKind::Subscription => info.ty = root(schema, OperationType::Subscription),
        RuleKind::InlineFragment | RuleKind::FragmentDefinition => {
            if let Some(type_name) = frame.type_name.as_deref() {
                info.ty = schema_utils::named_type(schema, type_name);
            }
        }
        RuleKind::Field | RuleKind::AliasedField => match (&info.ty, name) {
            (Some(_), Some(field_name)) => {
                info.field_def = info
                    .parent_type
                    .as_ref()
                    .and_then(|parent| schema_utils::field_def(schema, parent, field_name));
                info.ty = info.field_def.as_ref().map(|field| field.ty.clone());
            }
            _ => info.field_def = None,
        },
        RuleKind::SelectionSet => {
            info.parent_type = info.ty.as_ref().map(|ty| ty.inner_named_type().clone());
        }
        RuleKind::Directive => {
            info.directive_def =
                name.and_then(|name| schema.directive_definitions.get(name).cloned());
        }
        RuleKind::InterfaceDef => {
            if let Some(name) = name {
                info.object_type_def = None;
                info.interface_def = Some(name.to_string());
            }
        }
        RuleKind::ObjectTypeDef => {
            if let Some(name) = name {
                info.interface_def = None;
                info.object_type_def = Some(name.to_string());
            }
        }
        RuleKind::Arguments => {
            info.arg_defs = match prev.map(|prev| (prev.kind, prev.name.as_deref())) {
                Some((RuleKind::Field, _)) => info
                    .field_def
                    .as_ref()
                    .map(|field| field.arguments.clone()),
                Some((RuleKind::Directive, _)) => info
                    .directive_def
                    .as_ref()
                    .map(|directive| directive.arguments.clone()),
                // Fragment arguments are not part of the language yet.
                Some((RuleKind::FragmentSpread, _)) => info.arg_defs.take(),
                Some((RuleKind::AliasedField, Some(field_name))) => info
                    .parent_type
                    .as_ref()
                    .and_then(|parent| schema_utils::field_def(schema, parent, field_name))
                    .map(|field| field.arguments.clone()),
                _ => None,
            };
        }
        RuleKind::Argument => {
            if let Some(found) = info
                .arg_defs
                .as_ref()
                .and_then(|defs| defs.iter().find(|def| Some(def.name.as_str()) == name))
            {
                info.arg_def = Some(found.clone());
            }
            info.input_type = info.arg_def.as_ref().map(|arg| (*arg.ty).clone());
        }
        RuleKind::VariableDefinition | RuleKind::Variable => {
            info.ty.clone_from(&info.input_type);
        }
        RuleKind::EnumValue => {
            info.enum_value = info.named_input_type().and_then(|enum_name| {
                schema_utils::enum_values(schema, enum_name)?
                    .into_iter()
                    .find(|value| Some(value.value.as_str()) == name)
            });
        }
        RuleKind::ListValue => {
            info.input_type = info.input_type.as_ref().and_then(schema_utils::list_item_type);
        }
        RuleKind::ObjectValue => {
            info.object_field_defs = info
                .named_input_type()
                .and_then(|input_name| schema_utils::input_fields(schema, input_name));
        }
        RuleKind::ObjectField => {
            let field = name.and_then(|name| {
                info.object_field_defs
                    .as_ref()?
                    .iter()
                    .find(|field| field.name.as_str() == name)
                    .cloned()
            });
            info.input_type = field.as_ref().map(|field| (*field.ty).clone());
            info.ty.clone_from(&info.input_type);
            info.input_field_def = field;
        }
        RuleKind::NamedType => {
            if let Some(name) = name {
                info.ty = schema_utils::named_type(schema, name);
            }
        }
        _ => {}
    }
}

fn root(schema: &Schema, operation: OperationType) -> Option<ast::Type> {
    schema_utils::root_type(schema, operation).map(ast::Type::Named)
}

/// The innermost operation or fragment definition frame of `state`.
#[must_use]
pub fn definition_frame(state: &State) -> Option<&Frame> {
    state.frames().iter().rev().find(|frame| {
        matches!(
            frame.kind,
            RuleKind::Query
                | RuleKind::ShortQuery
                | RuleKind::Mutation
                | RuleKind::Subscription
                | RuleKind::FragmentDefinition
        )
    })
}
