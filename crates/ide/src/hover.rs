//! Hover descriptions for the token under the cursor.

use std::fmt::Write as _;

use apollo_compiler::ast;
use apollo_compiler::Schema;
use graphql_online_parser::{token_at_position, RuleKind, Style};
use graphql_types::{Position, Range};

use crate::schema_utils;
use crate::type_info::type_info;
use crate::types::HoverResult;

/// Describe the schema element at `position`, if there is one.
///
/// Fields render as `Parent.field: Type`, arguments as `field(arg: Type)`,
/// directives as `@name`, enum values as `Enum.VALUE` and named types by
/// name. Descriptions and deprecation reasons follow the signature.
#[must_use]
pub fn hover(schema: &Schema, text: &str, position: Position) -> Option<HoverResult> {
    let token = token_at_position(text, position);
    if matches!(
        token.style,
        Style::Ws | Style::Punctuation | Style::Comment | Style::InvalidChar
    ) {
        return None;
    }

    let state = &token.state;
    let info = type_info(schema, state);
    let mut hover = Hover::default();

    match state.kind()? {
        RuleKind::Field | RuleKind::AliasedField => {
            let field = info.field_def.as_ref()?;
            let parent = info.parent_type.as_ref()?;
            hover.signature = format!("{parent}.{}: {}", field.name, field.ty);
            hover.description = field.description.as_deref().map(str::to_string);
            hover.deprecation = schema_utils::deprecation_reason(&field.directives);
        }
        RuleKind::Argument => {
            let arg = info.arg_def.as_ref()?;
            let owner = match state.ancestor(2).map(|frame| frame.kind) {
                Some(RuleKind::Directive) => format!("@{}", info.directive_def.as_ref()?.name),
                _ => info.field_def.as_ref()?.name.to_string(),
            };
            hover.signature = format!("{owner}({}: {})", arg.name, &*arg.ty);
            hover.description = arg.description.as_deref().map(str::to_string);
            hover.deprecation = schema_utils::deprecation_reason(&arg.directives);
        }
        RuleKind::ObjectField => {
            let field = info.input_field_def.as_ref()?;
            hover.signature = format!("{}: {}", field.name, &*field.ty);
            hover.description = field.description.as_deref().map(str::to_string);
            hover.deprecation = schema_utils::deprecation_reason(&field.directives);
        }
        RuleKind::Directive => {
            let directive = info.directive_def.as_ref()?;
            hover.signature = format!("@{}", directive.name);
            hover.description = directive.description.as_deref().map(str::to_string);
        }
        RuleKind::EnumValue => {
            let value = info.enum_value.as_ref()?;
            let enum_name = info.named_input_type()?;
            hover.signature = format!("{enum_name}.{}", value.value);
            hover.description = value.description.as_deref().map(str::to_string);
            hover.deprecation = schema_utils::deprecation_reason(&value.directives);
        }
        RuleKind::Variable => {
            let ty = info.ty.as_ref()?;
            hover.signature = format!("${}: {ty}", state.name()?);
        }
        RuleKind::NamedType => {
            let name = info.ty.as_ref().map(ast::Type::inner_named_type)?;
            let extended = schema.types.get(name)?;
            hover.signature = name.to_string();
            hover.description = schema_utils::description_of(extended);
        }
        _ => return None,
    }

    let range = Range::new(
        Position::new(position.line, token.start as u32),
        Position::new(position.line, token.end as u32),
    );
    Some(HoverResult::new(hover.render()).with_range(range))
}

#[derive(Default)]
struct Hover {
    signature: String,
    description: Option<String>,
    deprecation: Option<String>,
}

impl Hover {
    fn render(&self) -> String {
        let mut text = format!("```graphql\n{}\n```\n\n", self.signature);
        if let Some(description) = &self.description {
            write!(text, "---\n\n{description}\n\n").ok();
        }
        if let Some(reason) = &self.deprecation {
            write!(text, "**Deprecated:** {reason}\n\n").ok();
        }
        text.truncate(text.trim_end().len());
        text
    }
}
