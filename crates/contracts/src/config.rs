//! ConsoleConfig - file-level configuration of the console process

use serde::{Deserialize, Serialize};

use crate::Settings;

/// Remote stream endpoint and channel sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Host of the proxy update stream.
    pub host: String,
    /// Port of the proxy update stream.
    pub port: u16,
    /// Transport event channel capacity.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    100
}

/// Top-level console configuration, loaded from TOML or JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub stream: StreamConfig,
    /// Settings shown before the first `update_settings` arrives.
    #[serde(default)]
    pub settings: Settings,
    /// Prometheus exporter port (absent = disabled).
    #[serde(default)]
    pub metrics_port: Option<u16>,
}
