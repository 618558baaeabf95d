//! Building project schemas and caching them by extension hash.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apollo_compiler::ast;
use apollo_compiler::parser::Parser;
use apollo_compiler::schema::SchemaBuilder;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use dashmap::DashMap;
use graphql_config::ProjectConfig;

use crate::{CacheError, Result};

/// Key of a cached schema: the schema patterns and the project name.
#[must_use]
pub fn schema_key(project_name: &str, project: &ProjectConfig) -> String {
    format!("{}:{project_name}", project.schema.key())
}

/// Order-independent hash of a set of type-system definitions.
///
/// Definitions are sorted by name (then by printed form) before hashing, so
/// the same definitions spread across files in any order hash the same.
#[must_use]
pub fn extension_hash(definitions: &[ast::Definition]) -> u64 {
    let mut printed: Vec<(String, String)> = definitions
        .iter()
        .map(|definition| {
            let name = definition
                .name()
                .map(ToString::to_string)
                .unwrap_or_default();
            (name, definition.to_string())
        })
        .collect();
    printed.sort();

    let mut hasher = DefaultHasher::new();
    printed.hash(&mut hasher);
    hasher.finish()
}

struct CachedSchema {
    extension_hash: u64,
    schema: Arc<Valid<Schema>>,
}

#[derive(Default)]
pub(crate) struct SchemaCache {
    entries: DashMap<String, CachedSchema>,
}

impl SchemaCache {
    /// The cached schema for `project_name` if it was built from the same
    /// extensions, otherwise a fresh build that replaces the cache entry.
    pub(crate) fn get_or_build(
        &self,
        project_name: &str,
        project: &ProjectConfig,
        root_dir: &Path,
        extensions: &[ast::Definition],
    ) -> Result<Arc<Valid<Schema>>> {
        let key = schema_key(project_name, project);
        let hash = extension_hash(extensions);
        if let Some(cached) = self.entries.get(&key) {
            if cached.extension_hash == hash {
                tracing::trace!(%key, "schema cache hit");
                return Ok(Arc::clone(&cached.schema));
            }
        }

        let schema = Arc::new(build_schema(project_name, project, root_dir, extensions)?);
        self.entries.insert(
            key,
            CachedSchema {
                extension_hash: hash,
                schema: Arc::clone(&schema),
            },
        );
        Ok(schema)
    }

    pub(crate) fn invalidate(&self, project_name: &str) {
        let suffix = format!(":{project_name}");
        self.entries.retain(|key, _| !key.ends_with(&suffix));
    }
}

/// Local schema files of `project`, in pattern order.
///
/// Plain paths are returned whether or not they exist; glob patterns expand
/// to the files that match. Remote URLs are left out.
#[must_use]
pub fn schema_files(project: &ProjectConfig, root_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in project.schema.local_paths() {
        let full = root_dir.join(pattern);
        if !pattern.contains(['*', '?', '[', '{']) {
            files.push(full);
            continue;
        }
        match glob::glob(&full.to_string_lossy()) {
            Ok(paths) => files.extend(paths.filter_map(std::result::Result::ok)),
            Err(error) => tracing::warn!(%pattern, %error, "invalid schema pattern"),
        }
    }
    files
}

#[tracing::instrument(skip_all, fields(project = project_name))]
fn build_schema(
    project_name: &str,
    project: &ProjectConfig,
    root_dir: &Path,
    extensions: &[ast::Definition],
) -> Result<Valid<Schema>> {
    if project.schema.has_remote_schema() {
        tracing::debug!("remote schema sources are not loaded");
    }

    let mut builder = SchemaBuilder::new();
    let mut parser = Parser::new();

    for path in schema_files(project, root_dir) {
        let text = std::fs::read_to_string(&path).map_err(|source| CacheError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::trace!(path = %path.display(), "adding schema file");
        parser.parse_into_schema_builder(text, &path, &mut builder);
    }

    let directives = project.custom_directives();
    if !directives.is_empty() {
        parser.parse_into_schema_builder(
            directives.join("\n"),
            "customDirectives.graphql",
            &mut builder,
        );
    }

    if !extensions.is_empty() {
        let text = extensions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n");
        parser.parse_into_schema_builder(text, "extensions.graphql", &mut builder);
    }

    let schema = builder.build().map_err(|with_errors| CacheError::InvalidSchema {
        project: project_name.to_string(),
        message: with_errors.errors.to_string(),
    })?;

    match schema.validate() {
        Ok(valid) => {
            tracing::debug!(types = valid.types.len(), "built schema");
            Ok(valid)
        }
        Err(with_errors) => {
            // Documents are still validated against a schema with problems.
            tracing::warn!(
                errors = with_errors.errors.len(),
                "schema has validation errors"
            );
            Ok(Valid::assume_valid(with_errors.partial))
        }
    }
}
