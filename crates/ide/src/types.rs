//! POD types for IDE features.
//!
//! Plain structs with public fields handed back to callers (the CLI, the
//! cache, an editor integration).

use std::path::PathBuf;
use std::sync::Arc;

use apollo_compiler::ast;
use apollo_compiler::Node;
use graphql_types::{DiagnosticSeverity, Position, Range};

/// Completion item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Field,
    Type,
    Keyword,
    Variable,
    EnumValue,
    Directive,
    Fragment,
    Argument,
    InputField,
    Interface,
}

impl CompletionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Type => "type",
            Self::Keyword => "keyword",
            Self::Variable => "variable",
            Self::EnumValue => "enum-value",
            Self::Directive => "directive",
            Self::Fragment => "fragment",
            Self::Argument => "argument",
            Self::InputField => "input-field",
            Self::Interface => "interface",
        }
    }
}

impl std::fmt::Display for CompletionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completion item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionKind,
    /// Usually the printed GraphQL type of the candidate.
    pub detail: Option<String>,
    pub documentation: Option<String>,
    pub insert_text: Option<String>,
    pub sort_text: Option<String>,
    pub deprecated: bool,
    pub deprecation_reason: Option<String>,
}

impl CompletionItem {
    #[must_use]
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
            documentation: None,
            insert_text: None,
            sort_text: None,
            deprecated: false,
            deprecation_reason: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach documentation, ignoring empty strings.
    #[must_use]
    pub fn with_documentation(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        if !doc.is_empty() {
            self.documentation = Some(doc);
        }
        self
    }

    #[must_use]
    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    /// Mark the item deprecated when `reason` is present.
    #[must_use]
    pub fn with_deprecation(mut self, reason: Option<String>) -> Self {
        self.deprecated = reason.is_some();
        self.deprecation_reason = reason;
        self
    }
}

/// Hover information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverResult {
    /// Markdown content
    pub contents: String,
    /// Range of the token the hover describes
    pub range: Option<Range>,
}

impl HoverResult {
    #[must_use]
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            range: None,
        }
    }

    #[must_use]
    pub const fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }
}

/// Diagnostic (error, warning, hint)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Which pass produced the diagnostic, e.g. `GraphQL: Syntax`.
    pub source: String,
    pub code: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        range: Range,
        severity: DiagnosticSeverity,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            message: message.into(),
            source: source.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// A resolved definition site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub path: PathBuf,
    /// Start of the definition's name.
    pub position: Position,
    /// The whole definition.
    pub range: Range,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionQueryResult {
    pub definitions: Vec<Definition>,
    /// Range of the node under the cursor.
    pub query_range: Range,
}

/// A fragment definition found in a project document.
#[derive(Debug, Clone)]
pub struct FragmentInfo {
    pub file_path: PathBuf,
    /// Full text of the file the fragment lives in.
    pub content: Arc<str>,
    pub definition: Node<ast::FragmentDefinition>,
}

impl FragmentInfo {
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name.as_str()
    }

    #[must_use]
    pub fn type_condition(&self) -> &str {
        self.definition.type_condition.as_str()
    }
}

/// An object, input-object or enum type definition found in a project
/// document.
#[derive(Debug, Clone)]
pub struct ObjectTypeInfo {
    pub file_path: PathBuf,
    pub content: Arc<str>,
    pub definition: ast::Definition,
}

impl ObjectTypeInfo {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.definition.name().map(apollo_compiler::Name::as_str)
    }
}

/// What an outline node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineKind {
    Operation,
    Fragment,
    Field,
    FragmentSpread,
    ObjectType,
    InputObjectType,
    InterfaceType,
    EnumType,
    EnumValue,
    FieldDefinition,
    InputValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextTokenKind {
    Keyword,
    /// The name a node is known by: an operation, fragment or type name.
    ClassName,
    Whitespace,
    Plain,
}

/// One styled piece of an outline node's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextToken {
    pub kind: TextTokenKind,
    pub value: String,
}

impl TextToken {
    #[must_use]
    pub fn new(kind: TextTokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A node of the document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineTree {
    /// Label pieces, e.g. `query`, ` `, `Me`.
    pub tokenized_text: Vec<TextToken>,
    /// Field or definition name. `None` for anonymous operations.
    pub representative_name: Option<String>,
    pub kind: OutlineKind,
    pub range: Range,
    pub children: Vec<OutlineTree>,
}

impl OutlineTree {
    /// The label as plain text.
    #[must_use]
    pub fn label(&self) -> String {
        self.tokenized_text
            .iter()
            .map(|token| token.value.as_str())
            .collect()
    }
}

/// Symbol kind, following the editor symbol kinds outline nodes map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Class,
    Struct,
    Field,
    Method,
    Enum,
    EnumMember,
    Interface,
}

impl SymbolKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Field => "field",
            Self::Method => "method",
            Self::Enum => "enum",
            Self::EnumMember => "enum-member",
            Self::Interface => "interface",
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flattened outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: Range,
    /// Name of the enclosing outline node.
    pub container_name: Option<String>,
}
