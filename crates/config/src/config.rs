use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::FileType;

/// Name given to the project of a single-project config.
pub const DEFAULT_PROJECT: &str = "default";

/// Top-level GraphQL configuration.
/// Either a single project or multiple named projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphQLConfig {
    /// Multi-project configuration
    Multi {
        projects: HashMap<String, ProjectConfig>,
    },
    /// Single project configuration (boxed to reduce enum size)
    Single(Box<ProjectConfig>),
}

impl GraphQLConfig {
    /// All projects, sorted by name.
    /// A single-project config yields one project named [`DEFAULT_PROJECT`].
    #[must_use]
    pub fn projects(&self) -> Vec<(&str, &ProjectConfig)> {
        match self {
            Self::Single(config) => vec![(DEFAULT_PROJECT, config.as_ref())],
            Self::Multi { projects } => {
                let mut all: Vec<_> = projects
                    .iter()
                    .map(|(name, config)| (name.as_str(), config))
                    .collect();
                all.sort_by_key(|(name, _)| *name);
                all
            }
        }
    }

    /// Get a specific project by name.
    #[must_use]
    pub fn get_project(&self, name: &str) -> Option<&ProjectConfig> {
        match self {
            Self::Single(config) if name == DEFAULT_PROJECT => Some(config.as_ref()),
            Self::Single(_) => None,
            Self::Multi { projects } => projects.get(name),
        }
    }

    /// Get a project, or [`ConfigError::ProjectNotFound`](crate::ConfigError::ProjectNotFound).
    pub fn require_project(&self, name: &str) -> crate::Result<&ProjectConfig> {
        self.get_project(name)
            .ok_or_else(|| crate::ConfigError::ProjectNotFound(name.to_string()))
    }

    #[must_use]
    pub const fn is_multi_project(&self) -> bool {
        matches!(self, Self::Multi { .. })
    }

    #[must_use]
    pub fn project_count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { projects } => projects.len(),
        }
    }

    /// Find the project a file belongs to.
    ///
    /// `config_dir` is the directory holding the config file; every pattern
    /// is relative to it. Projects are tried in name order and the first whose
    /// schema or document patterns match wins.
    #[must_use]
    pub fn find_project_for_document(&self, path: &Path, config_dir: &Path) -> Option<&str> {
        self.projects()
            .into_iter()
            .find(|(_, project)| project.matches(path, config_dir))
            .map(|(name, _)| name)
    }

    /// Whether `path` is a schema or document file of `project_name`.
    #[must_use]
    pub fn get_file_type(
        &self,
        path: &Path,
        config_dir: &Path,
        project_name: &str,
    ) -> Option<FileType> {
        self.get_project(project_name)?.file_type(path, config_dir)
    }
}

/// Configuration for a single GraphQL project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Schema source(s)
    pub schema: SchemaConfig,

    /// Document patterns (queries, mutations, fragments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<DocumentsConfig>,

    /// File patterns to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// File patterns to exclude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Tool-specific extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<HashMap<String, serde_json::Value>>,
}

impl ProjectConfig {
    /// A project with only a schema pattern.
    #[must_use]
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: SchemaConfig::Path(schema.into()),
            documents: None,
            include: None,
            exclude: None,
            extensions: None,
        }
    }

    /// Builder-style setter for document patterns.
    #[must_use]
    pub fn with_documents(mut self, patterns: &[&str]) -> Self {
        self.documents = Some(DocumentsConfig::Patterns(
            patterns.iter().map(ToString::to_string).collect(),
        ));
        self
    }

    /// Extra directive definitions listed under `extensions.customDirectives`.
    ///
    /// ```yaml
    /// extensions:
    ///   customDirectives:
    ///     - "directive @cached(ttl: Int) on FIELD"
    /// ```
    ///
    /// Non-string entries are ignored.
    #[must_use]
    pub fn custom_directives(&self) -> Vec<String> {
        self.extension("customDirectives")
            .and_then(serde_json::Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up one `extensions` entry.
    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.as_ref().and_then(|ext| ext.get(key))
    }

    /// Does `path` belong to this project, as a schema or a document file?
    #[must_use]
    pub fn matches(&self, path: &Path, config_dir: &Path) -> bool {
        self.file_type(path, config_dir).is_some()
    }

    /// Classify `path` against this project's patterns.
    ///
    /// `exclude` wins over everything, then `include` (when given) must
    /// match. Schema patterns are checked before document patterns.
    #[must_use]
    pub fn file_type(&self, path: &Path, config_dir: &Path) -> Option<FileType> {
        let Ok(relative) = path.strip_prefix(config_dir) else {
            tracing::trace!(path = %path.display(), "outside the config directory");
            return None;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        if self
            .exclude
            .as_ref()
            .is_some_and(|patterns| matches_any(patterns.iter().map(String::as_str), &relative))
        {
            return None;
        }

        let in_scope = self
            .include
            .as_ref()
            .is_none_or(|patterns| matches_any(patterns.iter().map(String::as_str), &relative));
        if !in_scope {
            return None;
        }

        if matches_any(self.schema.paths(), &relative) {
            return Some(FileType::Schema);
        }

        self.documents
            .as_ref()
            .filter(|documents| matches_any(documents.patterns(), &relative))
            .map(|_| FileType::Document)
    }
}

/// Schema source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// Single file path or glob pattern
    Path(String),
    /// Multiple file paths or glob patterns
    Paths(Vec<String>),
}

impl SchemaConfig {
    /// All schema paths and patterns, remote URLs included.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Self::Path(path) => vec![path.as_str()],
            Self::Paths(paths) => paths.iter().map(String::as_str).collect(),
        }
    }

    /// Paths and patterns that point at local files.
    #[must_use]
    pub fn local_paths(&self) -> Vec<&str> {
        self.paths()
            .into_iter()
            .filter(|path| !is_remote(path))
            .collect()
    }

    /// Check if any schema source is an HTTP(S) URL.
    #[must_use]
    pub fn has_remote_schema(&self) -> bool {
        self.paths().into_iter().any(is_remote)
    }

    /// Cache key for this schema source: the patterns joined with `,`.
    #[must_use]
    pub fn key(&self) -> String {
        self.paths().join(",")
    }
}

fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// Documents source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentsConfig {
    /// Single pattern
    Pattern(String),
    /// Multiple patterns
    Patterns(Vec<String>),
}

impl DocumentsConfig {
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        match self {
            Self::Pattern(pattern) => vec![pattern.as_str()],
            Self::Patterns(patterns) => patterns.iter().map(String::as_str).collect(),
        }
    }
}

/// Does any of `patterns` match the config-relative `path`?
pub fn matches_any<'a>(patterns: impl IntoIterator<Item = &'a str>, path: &str) -> bool {
    patterns.into_iter().any(|pattern| {
        expand_braces(pattern).iter().any(|expanded| {
            glob::Pattern::new(expanded).is_ok_and(|glob| glob.matches(path))
        })
    })
}

/// Normalize a glob pattern so it compares against config-relative paths:
/// strips a leading `./` or `/` and collapses repeated slashes.
fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

    let mut normalized = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(ch);
    }
    normalized
}

/// Expand a single brace group, `src/**/*.{graphql,gql}`, into one pattern
/// per alternative. Patterns are normalized first.
fn expand_braces(pattern: &str) -> Vec<String> {
    let normalized = normalize_pattern(pattern);

    let group = normalized
        .find('{')
        .and_then(|start| normalized[start..].find('}').map(|len| (start, start + len)));
    let Some((start, end)) = group else {
        return vec![normalized];
    };

    let before = &normalized[..start];
    let after = &normalized[end + 1..];
    normalized[start + 1..end]
        .split(',')
        .map(|option| format!("{before}{}{after}", option.trim()))
        .collect()
}
