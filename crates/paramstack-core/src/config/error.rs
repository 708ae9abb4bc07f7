//! Configuration errors

use crate::value::ValueError;

/// Errors that can occur while loading settings or manifests
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(String),

    #[error("Invalid default for parameter {name}: {source}")]
    InvalidDefault {
        name: String,
        #[source]
        source: ValueError,
    },

    #[error("Parameter declared twice: {0}")]
    DuplicateParameter(String),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
