//! Action - the unit of change flowing through the dispatcher
//!
//! Actions are transient: created, dispatched once, discarded.

use serde::{Deserialize, Serialize};

use crate::{Flow, LogEntry, Settings};

/// Origin of a dispatched action.
///
/// Stamped by the dispatcher entry point used, never by the caller:
/// `dispatch_view_action` stamps [`ActionSource::View`],
/// `dispatch_server_action` stamps [`ActionSource::Server`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// Originated from a local UI interaction.
    View,
    /// Originated from the remote stream.
    Server,
}

/// Closed set of action payloads.
///
/// The serde tag matches the wire protocol: inbound stream messages are
/// JSON objects with a `type` field naming one of these variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionPayload {
    /// Replace the settings mapping wholesale with the carried object.
    UpdateSettings { settings: Settings },
    /// Append one entry to the event log.
    AddEvent { data: LogEntry },
    /// A brand-new intercepted flow.
    AddFlow { data: Flow },
    /// An update to a possibly-already-known flow.
    UpdateFlow { data: Flow },
}

impl ActionPayload {
    /// Wire name of the payload variant, for logging and metrics labels.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UpdateSettings { .. } => "update_settings",
            Self::AddEvent { .. } => "add_event",
            Self::AddFlow { .. } => "add_flow",
            Self::UpdateFlow { .. } => "update_flow",
        }
    }
}

/// A source-stamped action, as delivered to subscribers.
#[derive(Debug, Clone)]
pub struct Action {
    /// Where the action came from.
    pub source: ActionSource,
    /// The typed payload.
    pub payload: ActionPayload,
}

impl Action {
    /// Build a stamped action. Production code should go through the
    /// dispatcher entry points instead of calling this directly.
    pub fn new(source: ActionSource, payload: ActionPayload) -> Self {
        Self { source, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LogEventSource, LogLevel};

    #[test]
    fn test_payload_wire_tag() {
        let entry = LogEntry::remote(7, "connected", LogLevel::Info);
        let payload = ActionPayload::AddEvent { data: entry };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"type\":\"add_event\""), "got: {json}");
    }

    #[test]
    fn test_payload_decode_from_wire() {
        let raw = r#"{"type":"add_event","data":{"id":3,"message":"hello","level":"info","source":"remote"}}"#;
        let payload: ActionPayload = serde_json::from_str(raw).unwrap();
        match payload {
            ActionPayload::AddEvent { data } => {
                assert_eq!(data.id, Some(3));
                assert_eq!(data.message, "hello");
                assert_eq!(data.source, LogEventSource::Remote);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let raw = r#"{"type":"drop_table","data":{}}"#;
        let result: Result<ActionPayload, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_type_name() {
        let payload = ActionPayload::UpdateSettings {
            settings: Settings::default(),
        };
        assert_eq!(payload.type_name(), "update_settings");
    }
}
