//! # graphql-cache
//!
//! Project-wide state behind the editor features in `graphql-ide`: which
//! files belong to which project, the fragments and types they define, and
//! the schema each project validates against.
//!
//! A [`GraphQLCache`] is created from a loaded config, filled once with
//! [`GraphQLCache::populate`] and then kept current either by a
//! [`CacheWatcher`] or by feeding `notify` events to
//! [`GraphQLCache::handle_watch_event`].
//!
//! ```no_run
//! # async fn run() -> graphql_cache::Result<()> {
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(graphql_cache::GraphQLCache::discover(Path::new("."))?);
//! cache.populate().await?;
//! let fragments = cache.fragment_dependencies("{ me { ...UserFields } }", "default")?;
//! println!("{} fragments", fragments.len());
//!
//! let mut watcher = cache.watch()?;
//! while let Some(changed) = watcher.next().await {
//!     println!("{:?}", changed?);
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod dependencies;
mod discovery;
mod error;
mod index;
mod reader;
mod schema;
mod watch;

pub use cache::GraphQLCache;
pub use dependencies::{fragment_dependencies_for_ast, object_type_dependencies_for_ast};
pub use discovery::{
    discover_files, is_graphql_file, is_ignored, is_project_file, DEFAULT_IGNORES,
    GRAPHQL_EXTENSIONS,
};
pub use error::{CacheError, Result};
pub use index::{FileEntry, ProjectIndex};
pub use reader::{read_files, FileStamp, ReadFile, MAX_READS};
pub use schema::{extension_hash, schema_files, schema_key};
pub use watch::CacheWatcher;
