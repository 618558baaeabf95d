use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No GraphQL config found in {} or any parent directory", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Project '{0}' not found in config")]
    ProjectNotFound(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
