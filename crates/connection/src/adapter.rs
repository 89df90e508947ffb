//! ConnectionAdapter - inbound stream events to dispatched actions

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use contracts::{ActionPayload, ConsoleError, LogLevel};
use dispatcher::Dispatcher;
use observability::{record_action_dispatched, record_decode_failure, record_transport_event};
use stores::EventLogActions;

/// Event contract between the external transport and this adapter.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The persistent connection was established.
    Opened,
    /// One inbound message, JSON text matching an action payload.
    Message(String),
    /// Transport-level failure; the connection may still recover upstream.
    Error(String),
    /// The connection was closed by either end.
    Closed,
}

/// Re-emits inbound stream messages as server-origin actions and surfaces
/// connectivity conditions as UI-origin log entries.
///
/// Malformed payloads never reach the dispatcher: they are logged, counted,
/// and dropped.
pub struct ConnectionAdapter {
    dispatcher: Arc<Dispatcher>,
}

impl ConnectionAdapter {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Decode one inbound message into a typed action payload.
    pub fn decode(raw: &str) -> Result<ActionPayload, ConsoleError> {
        serde_json::from_str(raw).map_err(|e| ConsoleError::PayloadDecode {
            message: e.to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Handle one transport event synchronously.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                record_transport_event("opened");
                info!("Stream connection established");
            }
            TransportEvent::Message(raw) => {
                record_transport_event("message");
                match Self::decode(&raw) {
                    Ok(payload) => {
                        record_action_dispatched(payload.type_name(), "server");
                        self.dispatcher.dispatch_server_action(payload);
                    }
                    Err(e) => {
                        record_decode_failure();
                        warn!(error = %e, bytes = raw.len(), "Rejected malformed inbound payload");
                    }
                }
            }
            TransportEvent::Error(message) => {
                record_transport_event("error");
                warn!(error = %message, "Stream connection error");
                EventLogActions::add_event(
                    &self.dispatcher,
                    format!("Stream connection error: {message}"),
                    LogLevel::Error,
                );
            }
            TransportEvent::Closed => {
                record_transport_event("closed");
                info!("Stream connection closed");
                EventLogActions::add_info(&self.dispatcher, "Stream connection closed.");
            }
        }
    }

    /// Consume transport events until the channel closes.
    ///
    /// Each event runs to completion before the next is taken, so actions
    /// are dispatched in arrival order.
    #[instrument(name = "connection_adapter_run", skip(self, rx))]
    pub async fn run(self, mut rx: mpsc::Receiver<TransportEvent>) {
        debug!("Connection adapter started");
        while let Some(event) = rx.recv().await {
            self.handle_event(event);
        }
        debug!("Connection adapter stopped, transport channel closed");
    }
}
