//! Document outline.
//!
//! Operations, fragments and type definitions in document order, each with
//! its selections or members nested below it. An inline fragment has no
//! node of its own: its selections are lifted into the enclosing set.

use apollo_parser::cst::{self, CstNode};
use apollo_parser::Parser;
use graphql_types::LineIndex;

use crate::goto_definition::node_range;
use crate::types::{
    DocumentSymbol, OutlineKind, OutlineTree, SymbolKind, TextToken, TextTokenKind,
};

const ANONYMOUS: &str = "Anonymous";

/// Outline of `text`, or `None` when the document does not parse.
#[must_use]
pub fn outline(text: &str) -> Option<Vec<OutlineTree>> {
    let tree = Parser::new(text).parse();
    if tree.errors().next().is_some() {
        tracing::debug!("document has syntax errors, no outline");
        return None;
    }
    let builder = Builder {
        line_index: LineIndex::new(text),
    };
    Some(
        tree.document()
            .definitions()
            .filter_map(|definition| builder.definition(&definition))
            .collect(),
    )
}

/// The outline flattened into a symbol list, each node before its children.
///
/// Anonymous operations are listed as `Anonymous`. A document with syntax
/// errors has no symbols.
#[must_use]
pub fn document_symbols(text: &str) -> Vec<DocumentSymbol> {
    let mut symbols = Vec::new();
    for tree in outline(text).unwrap_or_default() {
        push_symbols(&tree, None, &mut symbols);
    }
    symbols
}

fn push_symbols(tree: &OutlineTree, container: Option<&str>, symbols: &mut Vec<DocumentSymbol>) {
    symbols.push(DocumentSymbol {
        name: tree
            .representative_name
            .clone()
            .unwrap_or_else(|| ANONYMOUS.to_owned()),
        kind: symbol_kind(tree),
        range: tree.range,
        container_name: container.map(str::to_owned),
    });
    for child in &tree.children {
        push_symbols(child, tree.representative_name.as_deref(), symbols);
    }
}

fn symbol_kind(tree: &OutlineTree) -> SymbolKind {
    match tree.kind {
        OutlineKind::Operation
        | OutlineKind::Fragment
        | OutlineKind::ObjectType
        | OutlineKind::InputObjectType => SymbolKind::Class,
        OutlineKind::FragmentSpread => SymbolKind::Struct,
        OutlineKind::FieldDefinition if !tree.children.is_empty() => SymbolKind::Method,
        OutlineKind::Field | OutlineKind::FieldDefinition | OutlineKind::InputValue => {
            SymbolKind::Field
        }
        OutlineKind::EnumType => SymbolKind::Enum,
        OutlineKind::EnumValue => SymbolKind::EnumMember,
        OutlineKind::InterfaceType => SymbolKind::Interface,
    }
}

struct Builder {
    line_index: LineIndex,
}

impl Builder {
    fn definition(&self, definition: &cst::Definition) -> Option<OutlineTree> {
        match definition {
            cst::Definition::OperationDefinition(op) => {
                // `{ ... }` is a query.
                let keyword = op.operation_type().map_or_else(
                    || "query".to_owned(),
                    |ty| ty.syntax().text().to_string().trim().to_owned(),
                );
                let name = op.name().map(|name| text(&name));
                let mut tokens = vec![TextToken::new(TextTokenKind::Keyword, keyword)];
                if let Some(name) = &name {
                    tokens.push(TextToken::new(TextTokenKind::Whitespace, " "));
                    tokens.push(TextToken::new(TextTokenKind::ClassName, name.as_str()));
                }
                let children = self.selections(op.selection_set());
                Some(self.node(op, OutlineKind::Operation, tokens, name, children))
            }
            cst::Definition::FragmentDefinition(fragment) => {
                let name = text(&fragment.fragment_name()?.name()?);
                let children = self.selections(fragment.selection_set());
                Some(self.named(fragment, OutlineKind::Fragment, "fragment", name, children))
            }
            cst::Definition::ObjectTypeDefinition(ty) => {
                let name = text(&ty.name()?);
                let children = self.field_definitions(ty.fields_definition());
                Some(self.named(ty, OutlineKind::ObjectType, "type", name, children))
            }
            cst::Definition::InterfaceTypeDefinition(ty) => {
                let name = text(&ty.name()?);
                let children = self.field_definitions(ty.fields_definition());
                Some(self.named(ty, OutlineKind::InterfaceType, "interface", name, children))
            }
            cst::Definition::InputObjectTypeDefinition(ty) => {
                let name = text(&ty.name()?);
                let children = ty
                    .input_fields_definition()
                    .map(|fields| self.input_values(fields.input_value_definitions()))
                    .unwrap_or_default();
                Some(self.named(ty, OutlineKind::InputObjectType, "input", name, children))
            }
            cst::Definition::EnumTypeDefinition(ty) => {
                let name = text(&ty.name()?);
                let children = ty
                    .enum_values_definition()
                    .map(|values| {
                        values
                            .enum_value_definitions()
                            .filter_map(|value| {
                                let name = text(&value.enum_value()?.name()?);
                                Some(self.plain(&value, OutlineKind::EnumValue, name, Vec::new()))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Some(self.named(ty, OutlineKind::EnumType, "enum", name, children))
            }
            _ => None,
        }
    }

    fn selections(&self, selection_set: Option<cst::SelectionSet>) -> Vec<OutlineTree> {
        let Some(selection_set) = selection_set else {
            return Vec::new();
        };
        let mut trees = Vec::new();
        for selection in selection_set.selections() {
            match selection {
                cst::Selection::Field(field) => trees.extend(self.field(&field)),
                cst::Selection::FragmentSpread(spread) => {
                    let Some(name) = spread.fragment_name().and_then(|name| name.name()) else {
                        continue;
                    };
                    let name = text(&name);
                    let tokens = vec![
                        TextToken::new(TextTokenKind::Plain, "..."),
                        TextToken::new(TextTokenKind::ClassName, name.as_str()),
                    ];
                    trees.push(self.node(
                        &spread,
                        OutlineKind::FragmentSpread,
                        tokens,
                        Some(name),
                        Vec::new(),
                    ));
                }
                cst::Selection::InlineFragment(inline) => {
                    trees.extend(self.selections(inline.selection_set()));
                }
            }
        }
        trees
    }

    fn field(&self, field: &cst::Field) -> Option<OutlineTree> {
        let name = text(&field.name()?);
        let mut tokens = Vec::new();
        if let Some(alias) = field.alias().and_then(|alias| alias.name()) {
            tokens.push(TextToken::new(TextTokenKind::Plain, text(&alias)));
            tokens.push(TextToken::new(TextTokenKind::Plain, ": "));
        }
        tokens.push(TextToken::new(TextTokenKind::Plain, name.as_str()));
        let children = self.selections(field.selection_set());
        Some(self.node(field, OutlineKind::Field, tokens, Some(name), children))
    }

    fn field_definitions(&self, fields: Option<cst::FieldsDefinition>) -> Vec<OutlineTree> {
        let Some(fields) = fields else {
            return Vec::new();
        };
        fields
            .field_definitions()
            .filter_map(|field| {
                let name = text(&field.name()?);
                let arguments = field
                    .arguments_definition()
                    .map(|arguments| self.input_values(arguments.input_value_definitions()))
                    .unwrap_or_default();
                Some(self.plain(&field, OutlineKind::FieldDefinition, name, arguments))
            })
            .collect()
    }

    fn input_values(
        &self,
        values: cst::CstChildren<cst::InputValueDefinition>,
    ) -> Vec<OutlineTree> {
        values
            .filter_map(|value| {
                let name = text(&value.name()?);
                Some(self.plain(&value, OutlineKind::InputValue, name, Vec::new()))
            })
            .collect()
    }

    /// `keyword Name`, as used for fragments and type definitions.
    fn named<N: CstNode>(
        &self,
        node: &N,
        kind: OutlineKind,
        keyword: &str,
        name: String,
        children: Vec<OutlineTree>,
    ) -> OutlineTree {
        let tokens = vec![
            TextToken::new(TextTokenKind::Keyword, keyword),
            TextToken::new(TextTokenKind::Whitespace, " "),
            TextToken::new(TextTokenKind::ClassName, name.as_str()),
        ];
        self.node(node, kind, tokens, Some(name), children)
    }

    fn plain<N: CstNode>(
        &self,
        node: &N,
        kind: OutlineKind,
        name: String,
        children: Vec<OutlineTree>,
    ) -> OutlineTree {
        let tokens = vec![TextToken::new(TextTokenKind::Plain, name.as_str())];
        self.node(node, kind, tokens, Some(name), children)
    }

    fn node<N: CstNode>(
        &self,
        node: &N,
        kind: OutlineKind,
        tokenized_text: Vec<TextToken>,
        representative_name: Option<String>,
        children: Vec<OutlineTree>,
    ) -> OutlineTree {
        OutlineTree {
            tokenized_text,
            representative_name,
            kind,
            range: self.line_index.range(node_range(node)),
            children,
        }
    }
}

fn text(name: &cst::Name) -> String {
    name.text().as_str().to_owned()
}
