//! Layered error definitions
//!
//! Categorized by source: config / transport / decode / store

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ConsoleError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Transport Errors =====
    /// Stream connection error
    #[error("stream connection error: {message}")]
    StreamConnection { message: String },

    /// Stream closed by the remote end
    #[error("stream closed: {message}")]
    StreamClosed { message: String },

    // ===== Decode Errors =====
    /// Inbound payload could not be decoded as an action
    #[error("payload decode error: {message}")]
    PayloadDecode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Store Errors =====
    /// A store rejected an action
    #[error("store '{store}' error: {message}")]
    Store { store: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ConsoleError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create stream connection error
    pub fn stream_connection(message: impl Into<String>) -> Self {
        Self::StreamConnection {
            message: message.into(),
        }
    }

    /// Create payload decode error
    pub fn payload_decode(message: impl Into<String>) -> Self {
        Self::PayloadDecode {
            message: message.into(),
            source: None,
        }
    }

    /// Create store error
    pub fn store(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            message: message.into(),
        }
    }
}
