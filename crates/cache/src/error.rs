use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error(transparent)]
    Config(#[from] graphql_config::ConfigError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Project '{0}' not found in config")]
    ProjectNotFound(String),

    #[error("Schema for project '{project}' failed to build: {message}")]
    InvalidSchema { project: String, message: String },

    #[error("Background read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, CacheError>;
