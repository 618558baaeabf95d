//! The grammar table.
//!
//! Every [`RuleKind`] maps to a [`Rule`]: either a choice function that picks
//! the next kind from the upcoming token, or a fixed sequence of [`Step`]s.
//! The productions stay close to the GraphQL grammar but are shaped for a
//! parser that sees one token at a time; `AliasedField` for example is split
//! out of `Field` so a single lookahead decides between them.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::lexer::{Token, TokenKind};
use crate::scanner::CharacterStream;

/// Names of grammar productions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleKind {
    Document,
    Definition,
    ShortQuery,
    Query,
    Mutation,
    Subscription,
    VariableDefinitions,
    VariableDefinition,
    Variable,
    DefaultValue,
    SelectionSet,
    Selection,
    AliasedField,
    Field,
    Arguments,
    Argument,
    FragmentSpread,
    InlineFragment,
    FragmentDefinition,
    TypeCondition,
    Value,
    NumberValue,
    StringValue,
    BooleanValue,
    NullValue,
    EnumValue,
    ListValue,
    ObjectValue,
    ObjectField,
    Type,
    ListType,
    NonNullType,
    NamedType,
    Directive,
    DirectiveDef,
    DirectiveLocation,
    SchemaDef,
    OperationTypeDef,
    ScalarDef,
    ObjectTypeDef,
    InterfaceDef,
    Implements,
    FieldDef,
    ArgumentsDef,
    InputValueDef,
    UnionDef,
    UnionMember,
    EnumDef,
    EnumValueDef,
    InputDef,
    ExtendDef,
    ExtensionDefinition,
    SchemaExtension,
    ScalarTypeExtension,
    ObjectTypeExtension,
    InterfaceTypeExtension,
    UnionTypeExtension,
    EnumTypeExtension,
    InputObjectTypeExtension,
    /// Unparseable input. Popped before the next token.
    Invalid,
    /// A comment. Popped before the next token.
    Comment,
}

impl RuleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Definition => "Definition",
            Self::ShortQuery => "ShortQuery",
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
            Self::VariableDefinitions => "VariableDefinitions",
            Self::VariableDefinition => "VariableDefinition",
            Self::Variable => "Variable",
            Self::DefaultValue => "DefaultValue",
            Self::SelectionSet => "SelectionSet",
            Self::Selection => "Selection",
            Self::AliasedField => "AliasedField",
            Self::Field => "Field",
            Self::Arguments => "Arguments",
            Self::Argument => "Argument",
            Self::FragmentSpread => "FragmentSpread",
            Self::InlineFragment => "InlineFragment",
            Self::FragmentDefinition => "FragmentDefinition",
            Self::TypeCondition => "TypeCondition",
            Self::Value => "Value",
            Self::NumberValue => "NumberValue",
            Self::StringValue => "StringValue",
            Self::BooleanValue => "BooleanValue",
            Self::NullValue => "NullValue",
            Self::EnumValue => "EnumValue",
            Self::ListValue => "ListValue",
            Self::ObjectValue => "ObjectValue",
            Self::ObjectField => "ObjectField",
            Self::Type => "Type",
            Self::ListType => "ListType",
            Self::NonNullType => "NonNullType",
            Self::NamedType => "NamedType",
            Self::Directive => "Directive",
            Self::DirectiveDef => "DirectiveDef",
            Self::DirectiveLocation => "DirectiveLocation",
            Self::SchemaDef => "SchemaDef",
            Self::OperationTypeDef => "OperationTypeDef",
            Self::ScalarDef => "ScalarDef",
            Self::ObjectTypeDef => "ObjectTypeDef",
            Self::InterfaceDef => "InterfaceDef",
            Self::Implements => "Implements",
            Self::FieldDef => "FieldDef",
            Self::ArgumentsDef => "ArgumentsDef",
            Self::InputValueDef => "InputValueDef",
            Self::UnionDef => "UnionDef",
            Self::UnionMember => "UnionMember",
            Self::EnumDef => "EnumDef",
            Self::EnumValueDef => "EnumValueDef",
            Self::InputDef => "InputDef",
            Self::ExtendDef => "ExtendDef",
            Self::ExtensionDefinition => "ExtensionDefinition",
            Self::SchemaExtension => "SchemaExtension",
            Self::ScalarTypeExtension => "ScalarTypeExtension",
            Self::ObjectTypeExtension => "ObjectTypeExtension",
            Self::InterfaceTypeExtension => "InterfaceTypeExtension",
            Self::UnionTypeExtension => "UnionTypeExtension",
            Self::EnumTypeExtension => "EnumTypeExtension",
            Self::InputObjectTypeExtension => "InputObjectTypeExtension",
            Self::Invalid => "Invalid",
            Self::Comment => "Comment",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highlighting class returned for each token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Ws,
    InvalidChar,
    Comment,
    Punctuation,
    Keyword,
    Def,
    Variable,
    Property,
    Qualifier,
    Attribute,
    Number,
    String,
    String2,
    Builtin,
    Atom,
    Meta,
}

impl Style {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ws => "ws",
            Self::InvalidChar => "invalidchar",
            Self::Comment => "comment",
            Self::Punctuation => "punctuation",
            Self::Keyword => "keyword",
            Self::Def => "def",
            Self::Variable => "variable",
            Self::Property => "property",
            Self::Qualifier => "qualifier",
            Self::Attribute => "attribute",
            Self::Number => "number",
            Self::String => "string",
            Self::String2 => "string-2",
            Self::Builtin => "builtin",
            Self::Atom => "atom",
            Self::Meta => "meta",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a terminal decides whether it accepts a token.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Any token of this kind.
    Kind(TokenKind),
    /// A `Name` token with exactly this text.
    Word(&'static str),
    /// A `Punctuation` token with exactly this text.
    Punctuation(&'static str),
    /// `base` matches and none of `excluded` do.
    ButNot {
        base: &'static Matcher,
        excluded: &'static [Matcher],
    },
}

impl Matcher {
    #[must_use]
    pub fn matches(&self, token: &Token) -> bool {
        match self {
            Self::Kind(kind) => token.kind == *kind,
            Self::Word(word) => token.kind == TokenKind::Name && token.value == *word,
            Self::Punctuation(value) => {
                token.kind == TokenKind::Punctuation && token.value == *value
            }
            Self::ButNot { base, excluded } => {
                base.matches(token) && !excluded.iter().any(|rule| rule.matches(token))
            }
        }
    }
}

/// What a matched terminal writes back into the parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    None,
    /// Record the token as the current frame's `name`.
    Name,
    /// Record the token as the current frame's `name` and as the `type` of
    /// the frame two levels up. `NamedType` sits one frame deeper than the
    /// definition (fragment, inline fragment, variable) that wants the type.
    NameAndAncestorType,
    /// Track whether a block string stays open past this line.
    BlockString,
}

/// A concrete state mutation produced by a terminal match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatePatch {
    SetName(String),
    SetNameAndAncestorType { depth: usize, name: String },
    BlockString(bool),
}

/// A token-level rule: style to report, matcher and state update.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
    pub style: Style,
    pub matcher: Matcher,
    pub update: Update,
}

impl Terminal {
    #[must_use]
    pub fn matches(&self, token: &Token) -> bool {
        self.matcher.matches(token)
    }

    /// The patch to apply once `token` matched this terminal.
    #[must_use]
    pub fn patch(&self, token: &Token) -> Option<StatePatch> {
        match self.update {
            Update::None => None,
            Update::Name => Some(StatePatch::SetName(token.value.clone())),
            Update::NameAndAncestorType => Some(StatePatch::SetNameAndAncestorType {
                depth: 2,
                name: token.value.clone(),
            }),
            Update::BlockString => token
                .value
                .strip_prefix(r#"""""#)
                .map(|rest| StatePatch::BlockString(!rest.ends_with(r#"""""#))),
        }
    }
}

/// The thing a step expects: another rule or a terminal.
#[derive(Debug, Clone, Copy)]
pub enum Item {
    Rule(RuleKind),
    Terminal(Terminal),
}

/// Separator between list items.
#[derive(Debug, Clone, Copy)]
pub struct Separator {
    pub terminal: Terminal,
    /// Optional separators may be left out between items.
    pub optional: bool,
}

/// One entry of a sequence rule.
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Rule(RuleKind),
    Terminal(Terminal),
    Optional(Item),
    List {
        item: Item,
        separator: Option<Separator>,
    },
}

impl Step {
    /// The rule or terminal this step expects, with wrappers removed.
    #[must_use]
    pub const fn item(&self) -> Item {
        match *self {
            Self::Rule(kind) => Item::Rule(kind),
            Self::Terminal(terminal) => Item::Terminal(terminal),
            Self::Optional(item) | Self::List { item, .. } => item,
        }
    }

    /// The separator terminal of a list step.
    #[must_use]
    pub const fn separator(&self) -> Option<Separator> {
        match *self {
            Self::List { separator, .. } => separator,
            _ => None,
        }
    }

    /// Optional and list steps may be skipped when they fail to match.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::List { .. })
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }
}

/// Chooses the next kind from the upcoming token.
pub type ChoiceFn = fn(&Token, &CharacterStream<'_>) -> Option<RuleKind>;

/// A grammar production.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Evaluated once, at step 0.
    Choice(ChoiceFn),
    Sequence(&'static [Step]),
}

impl Rule {
    /// Rules with nothing to match (`Invalid`, `Comment`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Sequence(steps) if steps.is_empty())
    }

    /// Whether a frame at `step` has matched every step of this rule.
    #[must_use]
    pub const fn is_complete(&self, step: usize) -> bool {
        match self {
            Self::Choice(_) => true,
            Self::Sequence(steps) => step >= steps.len(),
        }
    }

    /// The step at index `step`, if this is a sequence.
    #[must_use]
    pub fn step(&self, step: usize) -> Option<&'static Step> {
        match *self {
            Self::Choice(_) => None,
            Self::Sequence(steps) => steps.get(step),
        }
    }
}

const fn word(value: &'static str) -> Step {
    Step::Terminal(word_terminal(value))
}

const fn word_terminal(value: &'static str) -> Terminal {
    Terminal {
        style: Style::Keyword,
        matcher: Matcher::Word(value),
        update: Update::None,
    }
}

const fn name_terminal(style: Style) -> Terminal {
    Terminal {
        style,
        matcher: Matcher::Kind(TokenKind::Name),
        update: Update::Name,
    }
}

const fn name(style: Style) -> Step {
    Step::Terminal(name_terminal(style))
}

const fn type_name(style: Style) -> Step {
    Step::Terminal(Terminal {
        style,
        matcher: Matcher::Kind(TokenKind::Name),
        update: Update::NameAndAncestorType,
    })
}

const fn kind(kind: TokenKind, style: Style) -> Step {
    Step::Terminal(Terminal {
        style,
        matcher: Matcher::Kind(kind),
        update: Update::None,
    })
}

const fn punct_terminal(value: &'static str, style: Style) -> Terminal {
    Terminal {
        style,
        matcher: Matcher::Punctuation(value),
        update: Update::None,
    }
}

const fn p(value: &'static str) -> Step {
    Step::Terminal(punct_terminal(value, Style::Punctuation))
}

const fn p_styled(value: &'static str, style: Style) -> Step {
    Step::Terminal(punct_terminal(value, style))
}

const fn rule(kind: RuleKind) -> Step {
    Step::Rule(kind)
}

const fn opt(kind: RuleKind) -> Step {
    Step::Optional(Item::Rule(kind))
}

const fn opt_p(value: &'static str) -> Step {
    Step::Optional(Item::Terminal(punct_terminal(value, Style::Punctuation)))
}

const fn opt_word(value: &'static str) -> Step {
    Step::Optional(Item::Terminal(word_terminal(value)))
}

const fn list(kind: RuleKind) -> Step {
    Step::List {
        item: Item::Rule(kind),
        separator: None,
    }
}

const fn list_sep(kind: RuleKind, value: &'static str, optional: bool) -> Step {
    Step::List {
        item: Item::Rule(kind),
        separator: Some(Separator {
            terminal: punct_terminal(value, Style::Punctuation),
            optional,
        }),
    }
}

use RuleKind as K;

const DOCUMENT: &[Step] = &[list(K::Definition)];
const SHORT_QUERY: &[Step] = &[rule(K::SelectionSet)];
const QUERY: &[Step] = &[
    word("query"),
    Step::Optional(Item::Terminal(name_terminal(Style::Def))),
    opt(K::VariableDefinitions),
    list(K::Directive),
    rule(K::SelectionSet),
];
const MUTATION: &[Step] = &[
    word("mutation"),
    Step::Optional(Item::Terminal(name_terminal(Style::Def))),
    opt(K::VariableDefinitions),
    list(K::Directive),
    rule(K::SelectionSet),
];
const SUBSCRIPTION: &[Step] = &[
    word("subscription"),
    Step::Optional(Item::Terminal(name_terminal(Style::Def))),
    opt(K::VariableDefinitions),
    list(K::Directive),
    rule(K::SelectionSet),
];
const VARIABLE_DEFINITIONS: &[Step] = &[p("("), list(K::VariableDefinition), p(")")];
const VARIABLE_DEFINITION: &[Step] = &[
    rule(K::Variable),
    p(":"),
    rule(K::Type),
    opt(K::DefaultValue),
    list(K::Directive),
];
const VARIABLE: &[Step] = &[p_styled("$", Style::Variable), name(Style::Variable)];
const DEFAULT_VALUE: &[Step] = &[p("="), rule(K::Value)];
const SELECTION_SET: &[Step] = &[p("{"), list(K::Selection), p("}")];
const ALIASED_FIELD: &[Step] = &[
    name(Style::Property),
    p(":"),
    name(Style::Qualifier),
    opt(K::Arguments),
    list(K::Directive),
    opt(K::SelectionSet),
];
const FIELD: &[Step] = &[
    name(Style::Property),
    opt(K::Arguments),
    list(K::Directive),
    opt(K::SelectionSet),
];
const ARGUMENTS: &[Step] = &[p("("), list(K::Argument), p(")")];
const ARGUMENT: &[Step] = &[name(Style::Attribute), p(":"), rule(K::Value)];
const FRAGMENT_SPREAD: &[Step] = &[p("..."), name(Style::Def), list(K::Directive)];
const INLINE_FRAGMENT: &[Step] = &[
    p("..."),
    opt(K::TypeCondition),
    list(K::Directive),
    rule(K::SelectionSet),
];
const FRAGMENT_DEFINITION: &[Step] = &[
    word("fragment"),
    Step::Optional(Item::Terminal(Terminal {
        style: Style::Def,
        matcher: Matcher::ButNot {
            base: &Matcher::Kind(TokenKind::Name),
            excluded: &[Matcher::Word("on")],
        },
        update: Update::Name,
    })),
    rule(K::TypeCondition),
    list(K::Directive),
    rule(K::SelectionSet),
];
const TYPE_CONDITION: &[Step] = &[word("on"), rule(K::NamedType)];
const NUMBER_VALUE: &[Step] = &[kind(TokenKind::Number, Style::Number)];
const STRING_VALUE: &[Step] = &[Step::Terminal(Terminal {
    style: Style::String,
    matcher: Matcher::Kind(TokenKind::String),
    update: Update::BlockString,
})];
const BOOLEAN_VALUE: &[Step] = &[kind(TokenKind::Name, Style::Builtin)];
const NULL_VALUE: &[Step] = &[kind(TokenKind::Name, Style::Keyword)];
const ENUM_VALUE: &[Step] = &[name(Style::String2)];
const LIST_VALUE: &[Step] = &[p("["), list(K::Value), p("]")];
const OBJECT_VALUE: &[Step] = &[p("{"), list(K::ObjectField), p("}")];
const OBJECT_FIELD: &[Step] = &[name(Style::Attribute), p(":"), rule(K::Value)];
// `NonNullType` folds into `ListType` for lists.
const LIST_TYPE: &[Step] = &[p("["), rule(K::Type), p("]"), opt_p("!")];
const NON_NULL_TYPE: &[Step] = &[rule(K::NamedType), opt_p("!")];
const NAMED_TYPE: &[Step] = &[type_name(Style::Atom)];
const DIRECTIVE: &[Step] = &[
    p_styled("@", Style::Meta),
    name(Style::Meta),
    opt(K::Arguments),
];
const DIRECTIVE_DEF: &[Step] = &[
    word("directive"),
    p_styled("@", Style::Meta),
    name(Style::Meta),
    opt(K::ArgumentsDef),
    opt_word("repeatable"),
    word("on"),
    opt_p("|"),
    list_sep(K::DirectiveLocation, "|", false),
];
const DIRECTIVE_LOCATION: &[Step] = &[name(Style::String2)];
const SCHEMA_DEF: &[Step] = &[
    word("schema"),
    list(K::Directive),
    p("{"),
    list(K::OperationTypeDef),
    p("}"),
];
const OPERATION_TYPE_DEF: &[Step] = &[name(Style::Keyword), p(":"), name(Style::Atom)];
const SCALAR_DEF: &[Step] = &[word("scalar"), name(Style::Atom), list(K::Directive)];
const OBJECT_TYPE_DEF: &[Step] = &[
    word("type"),
    name(Style::Atom),
    opt(K::Implements),
    list(K::Directive),
    p("{"),
    list(K::FieldDef),
    p("}"),
];
const INTERFACE_DEF: &[Step] = &[
    word("interface"),
    name(Style::Atom),
    opt(K::Implements),
    list(K::Directive),
    p("{"),
    list(K::FieldDef),
    p("}"),
];
// `&` between interfaces is optional for the legacy comma/space form.
const IMPLEMENTS: &[Step] = &[
    word("implements"),
    opt_p("&"),
    list_sep(K::NamedType, "&", true),
];
const FIELD_DEF: &[Step] = &[
    name(Style::Property),
    opt(K::ArgumentsDef),
    p(":"),
    rule(K::Type),
    list(K::Directive),
];
const ARGUMENTS_DEF: &[Step] = &[p("("), list(K::InputValueDef), p(")")];
const INPUT_VALUE_DEF: &[Step] = &[
    name(Style::Attribute),
    p(":"),
    rule(K::Type),
    opt(K::DefaultValue),
    list(K::Directive),
];
const UNION_DEF: &[Step] = &[
    word("union"),
    name(Style::Atom),
    list(K::Directive),
    p("="),
    opt_p("|"),
    list_sep(K::UnionMember, "|", false),
];
const UNION_MEMBER: &[Step] = &[rule(K::NamedType)];
const ENUM_DEF: &[Step] = &[
    word("enum"),
    name(Style::Atom),
    list(K::Directive),
    p("{"),
    list(K::EnumValueDef),
    p("}"),
];
const ENUM_VALUE_DEF: &[Step] = &[name(Style::String2), list(K::Directive)];
const INPUT_DEF: &[Step] = &[
    word("input"),
    name(Style::Atom),
    list(K::Directive),
    p("{"),
    list(K::InputValueDef),
    p("}"),
];
const EXTEND_DEF: &[Step] = &[word("extend"), rule(K::ExtensionDefinition)];
const EMPTY: &[Step] = &[];

#[allow(clippy::unwrap_used)]
static INLINE_FRAGMENT_LOOKAHEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\x{00A0},]*(?:on\b|@|\{)").unwrap());
#[allow(clippy::unwrap_used)]
static ALIAS_LOOKAHEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\x{00A0},]*:").unwrap());

fn definition(token: &Token, _: &CharacterStream<'_>) -> Option<RuleKind> {
    Some(match token.value.as_str() {
        "{" => K::ShortQuery,
        "query" => K::Query,
        "mutation" => K::Mutation,
        "subscription" => K::Subscription,
        "fragment" => K::FragmentDefinition,
        "schema" => K::SchemaDef,
        "scalar" => K::ScalarDef,
        "type" => K::ObjectTypeDef,
        "interface" => K::InterfaceDef,
        "union" => K::UnionDef,
        "enum" => K::EnumDef,
        "input" => K::InputDef,
        "extend" => K::ExtendDef,
        "directive" => K::DirectiveDef,
        _ => return None,
    })
}

fn extension_definition(token: &Token, _: &CharacterStream<'_>) -> Option<RuleKind> {
    Some(match token.value.as_str() {
        "schema" => K::SchemaExtension,
        "scalar" => K::ScalarTypeExtension,
        "type" => K::ObjectTypeExtension,
        "interface" => K::InterfaceTypeExtension,
        "union" => K::UnionTypeExtension,
        "enum" => K::EnumTypeExtension,
        "input" => K::InputObjectTypeExtension,
        _ => return None,
    })
}

fn selection(token: &Token, stream: &CharacterStream<'_>) -> Option<RuleKind> {
    Some(if token.value == "..." {
        if stream.lookahead(&INLINE_FRAGMENT_LOOKAHEAD) {
            K::InlineFragment
        } else {
            K::FragmentSpread
        }
    } else if stream.lookahead(&ALIAS_LOOKAHEAD) {
        K::AliasedField
    } else {
        K::Field
    })
}

// Variables are accepted where the grammar only allows constants.
fn value(token: &Token, _: &CharacterStream<'_>) -> Option<RuleKind> {
    match token.kind {
        TokenKind::Number => Some(K::NumberValue),
        TokenKind::String => Some(K::StringValue),
        TokenKind::Punctuation => match token.value.as_str() {
            "[" => Some(K::ListValue),
            "{" => Some(K::ObjectValue),
            "$" => Some(K::Variable),
            "&" => Some(K::NamedType),
            _ => None,
        },
        TokenKind::Name => Some(match token.value.as_str() {
            "true" | "false" => K::BooleanValue,
            "null" => K::NullValue,
            _ => K::EnumValue,
        }),
        TokenKind::Comment => None,
    }
}

fn type_rule(token: &Token, _: &CharacterStream<'_>) -> Option<RuleKind> {
    Some(if token.value == "[" {
        K::ListType
    } else {
        K::NonNullType
    })
}

/// Look up the production for `kind`.
#[must_use]
pub fn rule_for(kind: RuleKind) -> Rule {
    let steps = match kind {
        K::Definition => return Rule::Choice(definition),
        K::ExtensionDefinition => return Rule::Choice(extension_definition),
        K::Selection => return Rule::Choice(selection),
        K::Value => return Rule::Choice(value),
        K::Type => return Rule::Choice(type_rule),
        K::Document => DOCUMENT,
        K::ShortQuery => SHORT_QUERY,
        K::Query => QUERY,
        K::Mutation => MUTATION,
        K::Subscription => SUBSCRIPTION,
        K::VariableDefinitions => VARIABLE_DEFINITIONS,
        K::VariableDefinition => VARIABLE_DEFINITION,
        K::Variable => VARIABLE,
        K::DefaultValue => DEFAULT_VALUE,
        K::SelectionSet => SELECTION_SET,
        K::AliasedField => ALIASED_FIELD,
        K::Field => FIELD,
        K::Arguments => ARGUMENTS,
        K::Argument => ARGUMENT,
        K::FragmentSpread => FRAGMENT_SPREAD,
        K::InlineFragment => INLINE_FRAGMENT,
        K::FragmentDefinition => FRAGMENT_DEFINITION,
        K::TypeCondition => TYPE_CONDITION,
        K::NumberValue => NUMBER_VALUE,
        K::StringValue => STRING_VALUE,
        K::BooleanValue => BOOLEAN_VALUE,
        K::NullValue => NULL_VALUE,
        K::EnumValue => ENUM_VALUE,
        K::ListValue => LIST_VALUE,
        K::ObjectValue => OBJECT_VALUE,
        K::ObjectField => OBJECT_FIELD,
        K::ListType => LIST_TYPE,
        K::NonNullType => NON_NULL_TYPE,
        K::NamedType => NAMED_TYPE,
        K::Directive => DIRECTIVE,
        K::DirectiveDef => DIRECTIVE_DEF,
        K::DirectiveLocation => DIRECTIVE_LOCATION,
        K::SchemaDef | K::SchemaExtension => SCHEMA_DEF,
        K::OperationTypeDef => OPERATION_TYPE_DEF,
        K::ScalarDef | K::ScalarTypeExtension => SCALAR_DEF,
        K::ObjectTypeDef | K::ObjectTypeExtension => OBJECT_TYPE_DEF,
        K::InterfaceDef | K::InterfaceTypeExtension => INTERFACE_DEF,
        K::Implements => IMPLEMENTS,
        K::FieldDef => FIELD_DEF,
        K::ArgumentsDef => ARGUMENTS_DEF,
        K::InputValueDef => INPUT_VALUE_DEF,
        K::UnionDef | K::UnionTypeExtension => UNION_DEF,
        K::UnionMember => UNION_MEMBER,
        K::EnumDef | K::EnumTypeExtension => ENUM_DEF,
        K::EnumValueDef => ENUM_VALUE_DEF,
        K::InputDef | K::InputObjectTypeExtension => INPUT_DEF,
        K::ExtendDef => EXTEND_DEF,
        K::Invalid | K::Comment => EMPTY,
    };
    Rule::Sequence(steps)
}
