//! Settings - process-wide proxy options
//!
//! Replaced wholesale on every update action; partial merges are computed by
//! the action originator before dispatch.

use serde::{Deserialize, Serialize};

/// Proxy operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyMode {
    /// Explicit proxy.
    #[default]
    Regular,
    /// Transparent interception.
    Transparent,
    /// Reverse proxy to a fixed upstream.
    Reverse,
    /// SOCKS5 proxy.
    Socks5,
    /// Chained upstream proxy.
    Upstream,
}

/// Current console settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Proxy server version string.
    pub version: String,
    /// Whether the event log pane is shown.
    pub show_event_log: bool,
    /// Proxy operating mode.
    pub mode: ProxyMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "0.12".to_string(),
            show_event_log: true,
            mode: ProxyMode::Transparent,
        }
    }
}

impl Settings {
    /// Return a copy with the patch applied on top.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            version: patch.version.clone().unwrap_or_else(|| self.version.clone()),
            show_event_log: patch.show_event_log.unwrap_or(self.show_event_log),
            mode: patch.mode.unwrap_or(self.mode),
        }
    }
}

/// Partial settings update, merged into the current settings by
/// `SettingsActions::update` before dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub version: Option<String>,
    pub show_event_log: Option<bool>,
    pub mode: Option<ProxyMode>,
}

impl SettingsPatch {
    /// Patch only the event-log visibility flag.
    pub fn show_event_log(show: bool) -> Self {
        Self {
            show_event_log: Some(show),
            ..Self::default()
        }
    }
}
