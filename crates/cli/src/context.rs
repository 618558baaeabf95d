//! Loading the config, picking a project and filling the cache.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use graphql_cache::GraphQLCache;
use graphql_config::{GraphQLConfig, LoadedConfig, DEFAULT_PROJECT};

/// Everything a command needs: a populated cache and the selected project.
pub struct Context {
    pub cache: Arc<GraphQLCache>,
    pub project: String,
}

impl Context {
    /// Load the config at `config_path`, or the nearest one above the
    /// current directory, and index the selected project.
    pub async fn load(config_path: Option<&Path>, project: Option<&str>) -> Result<Self> {
        let loaded = match config_path {
            Some(path) => load_explicit(path)?,
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                graphql_config::discover(&cwd).context("Failed to load GraphQL config")?
            }
        };
        tracing::debug!(config = %loaded.path.display(), "loaded config");

        let project = select_project(&loaded.config, project)?;
        let cache = Arc::new(GraphQLCache::new(loaded));
        let files = cache
            .populate()
            .await
            .context("Failed to index project files")?;
        tracing::debug!(files, %project, "project indexed");

        Ok(Self { cache, project })
    }

    /// Absolute path and contents of a document named on the command line.
    pub fn read(file: &Path) -> Result<(PathBuf, String)> {
        let path = std::fs::canonicalize(file)
            .with_context(|| format!("Failed to resolve {}", file.display()))?;
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok((path, text))
    }
}

fn load_explicit(path: &Path) -> Result<LoadedConfig> {
    let path = std::fs::canonicalize(path)
        .with_context(|| format!("Config file not found: {}", path.display()))?;
    let config = graphql_config::load_config(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    let root_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(LoadedConfig {
        path,
        root_dir,
        config,
    })
}

/// The requested project, or the only one the config defines.
fn select_project(config: &GraphQLConfig, requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        config.require_project(name)?;
        return Ok(name.to_string());
    }
    if !config.is_multi_project() {
        return Ok(DEFAULT_PROJECT.to_string());
    }
    match config.projects().as_slice() {
        [(name, _)] => Ok((*name).to_string()),
        projects => {
            let names: Vec<_> = projects.iter().map(|(name, _)| *name).collect();
            bail!(
                "Config defines several projects ({}); pick one with --project",
                names.join(", ")
            )
        }
    }
}
