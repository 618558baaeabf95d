use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use apollo_compiler::ast;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use dashmap::DashMap;
use graphql_config::{FileType, GraphQLConfig, LoadedConfig, ProjectConfig};
use graphql_ide::{
    DefinitionQueryResult, DefinitionSources, Diagnostic, DiagnosticsOptions, FragmentInfo,
    ObjectTypeInfo,
};
use graphql_types::Position;

use crate::dependencies;
use crate::discovery::{discover_files, is_project_file};
use crate::index::{FileEntry, ProjectIndex};
use crate::reader::read_files;
use crate::schema::SchemaCache;
use crate::{CacheError, Result};

/// Project-wide state for one config: every indexed file, per-project
/// fragment and type indexes, and built schemas.
///
/// All maps are sharded, so the cache is shared as `Arc<GraphQLCache>` and
/// read while the watcher writes. Readers get point-in-time snapshots.
pub struct GraphQLCache {
    root_dir: PathBuf,
    config: GraphQLConfig,
    pub(crate) files: DashMap<PathBuf, FileEntry>,
    projects: HashMap<String, ProjectIndex>,
    schemas: SchemaCache,
}

impl GraphQLCache {
    /// Create an empty cache for `loaded`. The root directory is stored in
    /// canonical form so it lines up with the absolute paths the file
    /// watcher reports.
    #[must_use]
    pub fn new(loaded: LoadedConfig) -> Self {
        let projects = loaded
            .config
            .projects()
            .into_iter()
            .map(|(name, _)| (name.to_string(), ProjectIndex::default()))
            .collect();
        Self {
            root_dir: canonical(&loaded.root_dir),
            config: loaded.config,
            files: DashMap::new(),
            projects,
            schemas: SchemaCache::default(),
        }
    }

    /// Find the nearest config above `start_dir` and create an empty cache
    /// for it.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        Ok(Self::new(graphql_config::discover(start_dir)?))
    }

    /// Directory the config patterns are relative to.
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    #[must_use]
    pub fn config(&self) -> &GraphQLConfig {
        &self.config
    }

    /// Read and index every file of every project.
    ///
    /// Returns the number of files indexed.
    #[tracing::instrument(skip(self), fields(root = %self.root_dir.display()))]
    pub async fn populate(&self) -> Result<usize> {
        let paths = discover_files(&self.root_dir, self.project_configs());
        tracing::debug!(files = paths.len(), "discovered project files");

        let files = read_files(paths).await?;
        let count = files.len();
        for file in files {
            self.insert(FileEntry::parse(file));
        }
        tracing::debug!(
            files = count,
            fragments = self.projects.values().map(ProjectIndex::fragment_count).sum::<usize>(),
            "cache populated"
        );
        Ok(count)
    }

    /// Name of the first project claiming `path`.
    #[must_use]
    pub fn project_for(&self, path: &Path) -> Option<&str> {
        self.config.find_project_for_document(path, &self.root_dir)
    }

    /// A snapshot of the indexed file at `path`.
    #[must_use]
    pub fn file(&self, path: &Path) -> Option<FileEntry> {
        self.files.get(path).map(|entry| entry.value().clone())
    }

    /// Indexed document files of `project`, sorted by path.
    pub fn documents(&self, project: &str) -> Result<Vec<FileEntry>> {
        let config = self.project(project)?;
        let mut documents: Vec<FileEntry> = self
            .files
            .iter()
            .filter(|entry| {
                config.file_type(entry.key(), &self.root_dir) == Some(FileType::Document)
            })
            .map(|entry| entry.value().clone())
            .collect();
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }

    /// The schema of `project`.
    ///
    /// With `has_extensions`, type-system definitions found in the
    /// project's documents are applied on top of the schema files. The
    /// result is reused for as long as those definitions are unchanged.
    pub fn schema(&self, project: &str, has_extensions: bool) -> Result<Arc<Valid<Schema>>> {
        let config = self.project(project)?;
        let extensions: Vec<ast::Definition> = if has_extensions {
            self.documents(project)?
                .iter()
                .flat_map(FileEntry::type_system_definitions)
                .collect()
        } else {
            Vec::new()
        };
        self.schemas
            .get_or_build(project, config, &self.root_dir, &extensions)
    }

    pub fn fragment_definitions(&self, project: &str) -> Result<HashMap<String, FragmentInfo>> {
        Ok(self.index(project)?.fragments())
    }

    pub fn object_type_definitions(
        &self,
        project: &str,
    ) -> Result<HashMap<String, ObjectTypeInfo>> {
        Ok(self.index(project)?.object_types())
    }

    /// Fragments from other files that `text` needs, transitively.
    ///
    /// Text that does not parse has no dependencies.
    pub fn fragment_dependencies(&self, text: &str, project: &str) -> Result<Vec<FragmentInfo>> {
        let index = self.fragment_definitions(project)?;
        Ok(parse_document(text)
            .map(|document| Self::fragment_dependencies_for_ast(&document, &index))
            .unwrap_or_default())
    }

    #[must_use]
    pub fn fragment_dependencies_for_ast(
        document: &ast::Document,
        index: &HashMap<String, FragmentInfo>,
    ) -> Vec<FragmentInfo> {
        dependencies::fragment_dependencies_for_ast(document, index)
    }

    /// Type definitions from project documents that `text` refers to.
    pub fn object_type_dependencies(
        &self,
        text: &str,
        project: &str,
    ) -> Result<Vec<ObjectTypeInfo>> {
        let index = self.object_type_definitions(project)?;
        Ok(parse_document(text)
            .map(|document| dependencies::object_type_dependencies_for_ast(&document, &index))
            .unwrap_or_default())
    }

    /// Resolve the symbol at `position` in `text`, stored at `path`.
    ///
    /// Fields and arguments resolve only when the project schema builds.
    pub fn definition(
        &self,
        project: &str,
        path: &Path,
        text: &str,
        position: Position,
    ) -> Result<Option<DefinitionQueryResult>> {
        let fragments = self.fragment_dependencies(text, project)?;
        let object_types = self.object_type_dependencies(text, project)?;
        let schema_types: Vec<ObjectTypeInfo> =
            self.object_type_definitions(project)?.into_values().collect();
        let schema = match self.schema(project, false) {
            Ok(schema) => Some(schema),
            Err(error) => {
                tracing::debug!(%project, %error, "no schema for field definitions");
                None
            }
        };
        let sources = DefinitionSources {
            schema: schema.as_deref().map(|schema| &**schema),
            fragments: &fragments,
            object_types: &object_types,
            schema_types: &schema_types,
        };
        Ok(graphql_ide::definition(text, path, position, &sources))
    }

    /// Syntax and validation diagnostics for `text` within `project`.
    ///
    /// Fragments from other project files are visible to validation. When
    /// the schema cannot be built only the syntax pass runs.
    pub fn diagnostics(&self, project: &str, text: &str) -> Result<Vec<Diagnostic>> {
        let has_extensions = parse_document(text).is_some_and(|document| {
            document.definitions.iter().any(|definition| {
                !matches!(
                    definition,
                    ast::Definition::OperationDefinition(_)
                        | ast::Definition::FragmentDefinition(_)
                )
            })
        });
        let schema = match self.schema(project, has_extensions) {
            Ok(schema) => Some(schema),
            Err(error @ CacheError::ProjectNotFound(_)) => return Err(error),
            Err(error) => {
                tracing::warn!(%project, %error, "no schema, running syntax checks only");
                None
            }
        };
        let fragments = self.fragment_dependencies(text, project)?;
        let options = DiagnosticsOptions {
            external_fragments: &fragments,
            ..DiagnosticsOptions::default()
        };
        Ok(graphql_ide::diagnostics(text, schema.as_deref(), &options))
    }

    /// Index `entry` into every project that claims it.
    pub(crate) fn insert(&self, entry: FileEntry) {
        for (name, config) in self.config.projects() {
            if !is_project_file(&entry.path, &self.root_dir, config) {
                continue;
            }
            if let Some(index) = self.projects.get(name) {
                index.insert(&entry);
            }
            if config.file_type(&entry.path, &self.root_dir) == Some(FileType::Schema) {
                self.schemas.invalidate(name);
            }
        }
        tracing::trace!(path = %entry.path.display(), "indexed file");
        self.files.insert(entry.path.clone(), entry);
    }

    /// Forget `path` and everything it contributed. Returns whether the
    /// file was indexed.
    pub(crate) fn remove(&self, path: &Path) -> bool {
        let removed = self.files.remove(path).is_some();
        for (name, config) in self.config.projects() {
            if let Some(index) = self.projects.get(name) {
                index.remove(path);
            }
            if config.file_type(path, &self.root_dir) == Some(FileType::Schema) {
                self.schemas.invalidate(name);
            }
        }
        if removed {
            tracing::trace!(path = %path.display(), "removed file");
        }
        removed
    }

    /// Whether any project would index a file at `path`.
    pub(crate) fn is_tracked(&self, path: &Path) -> bool {
        self.project_configs()
            .into_iter()
            .any(|config| is_project_file(path, &self.root_dir, config))
    }

    pub(crate) fn project_configs(&self) -> Vec<&ProjectConfig> {
        self.config
            .projects()
            .into_iter()
            .map(|(_, config)| config)
            .collect()
    }

    fn project(&self, name: &str) -> Result<&ProjectConfig> {
        self.config
            .get_project(name)
            .ok_or_else(|| CacheError::ProjectNotFound(name.to_string()))
    }

    fn index(&self, name: &str) -> Result<&ProjectIndex> {
        self.projects
            .get(name)
            .ok_or_else(|| CacheError::ProjectNotFound(name.to_string()))
    }
}

fn parse_document(text: &str) -> Option<ast::Document> {
    ast::Document::parse(text, "document.graphql").ok()
}

/// `path` with symlinks and relative components resolved. A path that no
/// longer exists is resolved through its parent directory, and anything
/// else is returned unchanged.
pub(crate) fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = std::fs::canonicalize(path) {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map_or_else(|_| path.to_path_buf(), |parent| parent.join(name)),
        _ => path.to_path_buf(),
    }
}
