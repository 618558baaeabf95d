//! `graphql-config` loading for `.graphqlrc` / `graphql.config.*` files.

mod config;
mod error;
mod loader;

pub use config::{
    matches_any, DocumentsConfig, GraphQLConfig, ProjectConfig, SchemaConfig, DEFAULT_PROJECT,
};
pub use error::{ConfigError, Result};
pub use loader::{discover, find_config, load_config, load_config_from_str, LoadedConfig};

/// What a matched project file contributes to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Schema,
    Document,
}
