//! Event-log entry types

use serde::{Deserialize, Serialize};

/// Server-assigned event-log entry id, monotonically increasing.
pub type EventId = u64;

/// Severity of an event-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Where an event-log entry originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEventSource {
    /// Created locally by the console itself.
    Ui,
    /// Delivered by the remote proxy over the stream.
    Remote,
}

/// One event-log entry.
///
/// Entries from the remote source always carry an id; UI-originated entries
/// carry none and are superseded by the next bulk snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Server-assigned id; `None` for locally created entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub message: String,
    #[serde(default)]
    pub level: LogLevel,
    pub source: LogEventSource,
}

impl LogEntry {
    /// Entry as delivered by the remote source.
    pub fn remote(id: EventId, message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            id: Some(id),
            message: message.into(),
            level,
            source: LogEventSource::Remote,
        }
    }

    /// Locally created entry, no server id.
    pub fn ui(message: impl Into<String>, level: LogLevel) -> Self {
        Self {
            id: None,
            message: message.into(),
            level,
            source: LogEventSource::Ui,
        }
    }
}
