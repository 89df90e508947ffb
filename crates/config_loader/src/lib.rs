//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `ConsoleConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("console.toml")).unwrap();
//! println!("Stream endpoint: {}:{}", config.stream.host, config.stream.port);
//! ```

mod parser;
mod validator;

pub use contracts::ConsoleConfig;
pub use parser::ConfigFormat;

use contracts::ConsoleError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ConsoleConfig, ConsoleError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConsoleConfig, ConsoleError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize a ConsoleConfig to TOML string
    pub fn to_toml(config: &ConsoleConfig) -> Result<String, ConsoleError> {
        toml::to_string_pretty(config)
            .map_err(|e| ConsoleError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize a ConsoleConfig to JSON string
    pub fn to_json(config: &ConsoleConfig) -> Result<String, ConsoleError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ConsoleError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ConsoleError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConsoleError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ConsoleError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ConsoleError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
