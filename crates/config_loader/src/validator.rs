//! Configuration validation
//!
//! Rules:
//! - stream.host non-empty
//! - stream.port != 0
//! - stream.buffer_size > 0
//! - metrics_port, if set, != 0 and != stream.port
//! - settings.version non-empty

use contracts::{ConsoleConfig, ConsoleError};

/// Validate a ConsoleConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    validate_stream(config)?;
    validate_metrics_port(config)?;
    validate_settings(config)?;
    Ok(())
}

fn validate_stream(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    if config.stream.host.trim().is_empty() {
        return Err(ConsoleError::config_validation(
            "stream.host",
            "host cannot be empty",
        ));
    }
    if config.stream.port == 0 {
        return Err(ConsoleError::config_validation(
            "stream.port",
            "port must be non-zero",
        ));
    }
    if config.stream.buffer_size == 0 {
        return Err(ConsoleError::config_validation(
            "stream.buffer_size",
            "buffer_size must be > 0",
        ));
    }
    Ok(())
}

fn validate_metrics_port(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    if let Some(port) = config.metrics_port {
        if port == 0 {
            return Err(ConsoleError::config_validation(
                "metrics_port",
                "metrics_port must be non-zero when set",
            ));
        }
        if port == config.stream.port {
            return Err(ConsoleError::config_validation(
                "metrics_port",
                format!("metrics_port {port} collides with stream.port"),
            ));
        }
    }
    Ok(())
}

fn validate_settings(config: &ConsoleConfig) -> Result<(), ConsoleError> {
    if config.settings.version.trim().is_empty() {
        return Err(ConsoleError::config_validation(
            "settings.version",
            "version cannot be empty",
        ));
    }
    Ok(())
}
