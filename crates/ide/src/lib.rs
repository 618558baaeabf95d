//! # graphql-ide
//!
//! Editor features for GraphQL documents: completion, diagnostics, hover,
//! go-to-definition and the document outline.
//!
//! Every entry point is a pure function of the document text, a cursor and
//! whatever schema or project data the caller already holds. Nothing here
//! touches the file system; the `graphql-cache` crate supplies schemas and
//! fragment indexes.
//!
//! ## Architecture
//!
//! ```text
//! graphql-cli / editor integration
//!     ↓
//! graphql-cache ← schemas, fragment and type indexes, file watching
//!     ↓
//! graphql-ide (this crate) ← completion, diagnostics, hover, definitions
//!     ↓
//! graphql-online-parser ← restartable parser state at the cursor
//! ```
//!
//! Completion and hover work from the online parser's state, so they keep
//! working while the document is half-typed. Diagnostics, definitions and the
//! outline use the full `apollo-parser` tree.
//!
//! ```
//! use apollo_compiler::Schema;
//! use graphql_ide::{autocomplete_suggestions, CompletionOptions};
//! use graphql_types::Position;
//!
//! let schema = Schema::parse_and_validate(
//!     "type Query { user: User } type User { id: ID name: String }",
//!     "schema.graphql",
//! )
//! .unwrap();
//! let items = autocomplete_suggestions(
//!     &schema,
//!     "{ user { ",
//!     Position::new(0, 9),
//!     &CompletionOptions::default(),
//! );
//! let labels: Vec<_> = items.iter().map(|item| item.label.as_str()).collect();
//! assert_eq!(labels, ["id", "name"]);
//! ```

mod completion;
mod diagnostics;
mod goto_definition;
mod hint;
mod hover;
mod mode;
mod outline;
mod rules;
pub mod schema_utils;
mod type_info;
mod types;

pub use completion::{autocomplete_suggestions, CompletionOptions};
pub use diagnostics::{diagnostics, DiagnosticsOptions, SYNTAX_SOURCE, VALIDATION_SOURCE};
pub use goto_definition::{definition, DefinitionSources};
pub use hint::hint_list;
pub use hover::hover;
pub use mode::{document_mode, DocumentMode};
pub use outline::{document_symbols, outline};
pub use rules::{NoDeprecated, RuleViolation, ValidationRule};
pub use type_info::{definition_frame, type_info, TypeInfo};
pub use types::{
    CompletionItem, CompletionKind, Definition, DefinitionQueryResult, Diagnostic, DocumentSymbol,
    FragmentInfo, HoverResult, ObjectTypeInfo, OutlineKind, OutlineTree, SymbolKind, TextToken,
    TextTokenKind,
};

pub use graphql_types::{DiagnosticSeverity, Position, Range};
