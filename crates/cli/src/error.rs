//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration could not be loaded
    #[error("Failed to load configuration from {path}")]
    ConfigLoad {
        path: String,
        #[source]
        source: contracts::ConsoleError,
    },

    /// Configuration failed validation
    #[error("Configuration validation failed: {path}")]
    ValidationFailed { path: String },

    /// Command output could not be serialized
    #[error("Failed to serialize output")]
    Serialize(#[from] serde_json::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_load(path: impl Into<String>, source: contracts::ConsoleError) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            source,
        }
    }

    pub fn validation_failed(path: impl Into<String>) -> Self {
        Self::ValidationFailed { path: path.into() }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
