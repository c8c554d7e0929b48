//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration content could not be parsed
    #[error("Failed to parse {format} configuration: {message}")]
    Parse {
        /// Format being parsed
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// Configuration values are out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// File extension not recognized
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Environment override could not be applied
    #[error("Invalid environment override {var}: {message}")]
    Environment {
        /// Variable name
        var: String,
        /// What was wrong with the value
        message: String,
    },
}

impl ConfigError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an environment override error
    pub fn environment(var: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Environment {
            var: var.into(),
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ConfigError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
