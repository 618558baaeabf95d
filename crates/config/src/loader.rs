use crate::{ConfigError, GraphQLConfig, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A config file together with the directory its patterns are relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub root_dir: PathBuf,
    pub config: GraphQLConfig,
}

/// Config file names to search for, in order of preference
const CONFIG_FILES: &[&str] = &[
    ".graphqlrc.yml",
    ".graphqlrc.yaml",
    ".graphqlrc.json",
    ".graphqlrc",
    "graphql.config.yml",
    "graphql.config.yaml",
    "graphql.config.json",
];

/// Find and load the nearest config, walking up from `start_dir`.
///
/// Fails with [`ConfigError::NotFound`] when no config file exists in
/// `start_dir` or any of its ancestors.
/// The search starts from the canonical form of `start_dir`, so a relative
/// or symlinked start still yields an absolute `root_dir`.
pub fn discover(start_dir: &Path) -> Result<LoadedConfig> {
    let start_dir = &fs::canonicalize(start_dir)?;
    let path = find_config(start_dir)?
        .ok_or_else(|| ConfigError::NotFound(start_dir.to_path_buf()))?;
    let config = load_config(&path)?;
    let root_dir = path
        .parent()
        .map_or_else(|| start_dir.to_path_buf(), Path::to_path_buf);
    Ok(LoadedConfig {
        path,
        root_dir,
        config,
    })
}

/// Find a GraphQL config file by walking up the directory tree from the given start directory.
/// Returns the path to the config file if found.
#[tracing::instrument(fields(start = %start_dir.display()))]
pub fn find_config(start_dir: &Path) -> Result<Option<PathBuf>> {
    let mut current_dir = start_dir.to_path_buf();
    let mut checked_dirs = 0;

    loop {
        tracing::trace!(dir = %current_dir.display(), "Checking directory for config files");
        for file_name in CONFIG_FILES {
            let config_path = current_dir.join(file_name);
            if config_path.exists() && config_path.is_file() {
                tracing::info!(path = %config_path.display(), checked_dirs, "Found config file");
                return Ok(Some(config_path));
            }
        }

        checked_dirs += 1;
        if !current_dir.pop() {
            tracing::debug!(checked_dirs, "No config file found");
            break;
        }
    }

    Ok(None)
}

/// Load a GraphQL config from the specified path.
/// Automatically detects the format based on file extension.
#[tracing::instrument(fields(path = %path.display()))]
pub fn load_config(path: &Path) -> Result<GraphQLConfig> {
    tracing::debug!("Reading config file");
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents, path)?;
    tracing::info!(
        projects = config.project_count(),
        multi_project = config.is_multi_project(),
        "Config loaded successfully"
    );
    Ok(config)
}

/// Load a GraphQL config from a string.
/// The path is used for error messages and format detection.
#[tracing::instrument(skip(contents), fields(path = %path.display(), size = contents.len()))]
pub fn load_config_from_str(contents: &str, path: &Path) -> Result<GraphQLConfig> {
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");

    tracing::debug!(extension, file_name, "Detecting config format");

    let config = match extension {
        "yml" | "yaml" => {
            tracing::trace!("Parsing as YAML");
            parse_yaml(contents, path)?
        }
        "json" => {
            tracing::trace!("Parsing as JSON");
            parse_json(contents, path)?
        }
        "" if file_name == ".graphqlrc" => {
            // .graphqlrc without extension - try YAML first, then JSON
            tracing::trace!("Trying YAML then JSON for .graphqlrc");
            parse_yaml(contents, path).or_else(|_| parse_json(contents, path))?
        }
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    tracing::debug!("Validating config");
    validate_config(&config, path)?;

    Ok(config)
}

fn parse_yaml(contents: &str, path: &Path) -> Result<GraphQLConfig> {
    serde_saphyr::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("YAML parse error: {e}"),
    })
}

fn parse_json(contents: &str, path: &Path) -> Result<GraphQLConfig> {
    serde_json::from_str(contents).map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: format!("JSON parse error: {e}"),
    })
}

/// Validate the loaded configuration
#[tracing::instrument(skip(config, path), fields(path = %path.display(), projects = config.project_count()))]
fn validate_config(config: &GraphQLConfig, path: &Path) -> Result<()> {
    let invalid = |message: String| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    };

    for (project_name, project_config) in config.projects() {
        tracing::trace!(project = project_name, "Validating project config");

        let schema_paths = project_config.schema.paths();
        if schema_paths.is_empty() {
            return Err(invalid(format!(
                "Project '{project_name}' has empty schema configuration"
            )));
        }
        if schema_paths.iter().any(|schema_path| schema_path.trim().is_empty()) {
            return Err(invalid(format!("Project '{project_name}' has empty schema path")));
        }
        if project_config.schema.has_remote_schema() {
            tracing::warn!(
                project = project_name,
                "Remote schema URLs are not fetched; only local schema files are loaded"
            );
        }

        if let Some(documents) = &project_config.documents {
            let patterns = documents.patterns();
            if patterns.is_empty() {
                return Err(invalid(format!(
                    "Project '{project_name}' has empty documents configuration"
                )));
            }
            if patterns.iter().any(|pattern| pattern.trim().is_empty()) {
                return Err(invalid(format!(
                    "Project '{project_name}' has empty document pattern"
                )));
            }
        }

        if let Some(directives) = project_config.extension("customDirectives") {
            if !directives.is_array() {
                return Err(invalid(format!(
                    "Project '{project_name}': extensions.customDirectives must be a list of SDL strings"
                )));
            }
        }
    }

    tracing::debug!("Config validation passed");
    Ok(())
}
