//! Restartable GraphQL parser for editor tooling.
//!
//! Unlike a whole-document parser, the [`OnlineParser`] consumes one token at
//! a time and keeps everything it knows in a cloneable, serializable
//! [`State`]. Editors can cache the state at the end of each line and resume
//! from it after an edit, and completion can ask "which rule is active at the
//! cursor?" through [`token_at_position`] even when the document does not
//! parse.
//!
//! ```
//! use graphql_online_parser::{token_at_position, RuleKind};
//! use graphql_types::Position;
//!
//! let token = token_at_position("{ user { na", Position::new(0, 11));
//! assert_eq!(token.string, "na");
//! assert_eq!(token.state.kind(), Some(RuleKind::Field));
//! ```

mod api;
mod grammar;
mod lexer;
mod parser;
mod scanner;
mod state;

pub use api::{
    run_online_parser, token_at_position, tokenize, tokenize_line, ContextToken, LineToken,
    Tokenized,
};
pub use grammar::{
    rule_for, ChoiceFn, Item, Matcher, Rule, RuleKind, Separator, StatePatch, Step, Style,
    Terminal, Update,
};
pub use lexer::{is_ignored, lex, Token, TokenKind};
pub use parser::OnlineParser;
pub use scanner::{CharacterStream, Pattern};
pub use state::{Frame, State};
