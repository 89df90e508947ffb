//! Session orchestrator - wires the transport to the console core.
//!
//! Connects to the proxy event stream over TCP, feeds line-delimited JSON
//! messages to the connection adapter, and reports traffic through live
//! views as it is reconciled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use connection::{ConnectionAdapter, TransportEvent};
use contracts::{ConsoleConfig, LogLevel};
use stores::{Console, FlowEvent};

use super::SessionStats;

/// Session configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The console configuration
    pub config: ConsoleConfig,

    /// Maximum number of stream messages to process (None = unlimited)
    pub max_messages: Option<u64>,

    /// Session timeout (None = no timeout)
    pub timeout: Option<Duration>,

    /// Transport channel buffer size
    pub buffer_size: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main session orchestrator
pub struct Session {
    config: SessionConfig,
}

impl Session {
    /// Create a new session with the given configuration
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run the session to completion
    pub async fn run(self) -> Result<SessionStats> {
        let start_time = Instant::now();
        let stream_config = &self.config.config.stream;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Wire the console core
        let console = Console::new(self.config.config.settings.clone());
        let log_view = console.event_log().get_view(None);
        let flow_view = console.flows().get_view(None);

        // Report reconciled traffic as it lands in the stores
        console.event_log().entries().add_listener(|entry| {
            match entry.level {
                LogLevel::Debug => debug!(source = ?entry.source, "{}", entry.message),
                LogLevel::Info => info!(source = ?entry.source, "{}", entry.message),
                LogLevel::Warn => warn!(source = ?entry.source, "{}", entry.message),
                LogLevel::Error => {
                    tracing::error!(source = ?entry.source, "{}", entry.message)
                }
            };
        });
        console.flows().events().add_listener(|event| match event {
            FlowEvent::Added(flow) => info!(
                method = %flow.request.method,
                url = %flow.request.url(),
                "Flow intercepted"
            ),
            FlowEvent::Updated(flow) => info!(
                url = %flow.request.url(),
                status = flow.response.as_ref().map(|r| r.status_code),
                elapsed_ms = flow.elapsed_ms(),
                "Flow updated"
            ),
        });

        // Connect to the event stream
        info!(
            host = %stream_config.host,
            port = stream_config.port,
            "Connecting to event stream..."
        );

        let stream = TcpStream::connect((stream_config.host.as_str(), stream_config.port))
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to event stream at {}:{}",
                    stream_config.host, stream_config.port
                )
            })?;

        info!("Connected to event stream");

        // Start the adapter
        let (tx, rx) = mpsc::channel::<TransportEvent>(self.config.buffer_size);
        let adapter = ConnectionAdapter::new(console.dispatcher().clone());
        let adapter_handle = tokio::spawn(adapter.run(rx));

        let messages = Arc::new(AtomicU64::new(0));
        let feeder = feed_transport(stream, tx, self.config.max_messages, messages.clone());

        info!(max_messages = ?self.config.max_messages, "Session running");

        // Run with optional timeout
        if let Some(timeout) = self.config.timeout {
            if tokio::time::timeout(timeout, feeder).await.is_err() {
                warn!(timeout_secs = timeout.as_secs(), "Session timed out");
            }
        } else {
            feeder.await;
        }

        // Wait for the adapter to drain queued events
        let _ = tokio::time::timeout(Duration::from_secs(5), adapter_handle).await;

        let stats = SessionStats {
            messages_received: messages.load(Ordering::Relaxed),
            log_entries: log_view.get_all().len() as u64,
            flows: flow_view.get_all().len() as u64,
            duration: start_time.elapsed(),
            dispatch: console.dispatcher().metrics().snapshot(),
        };

        // Views detach their store subscriptions on drop
        drop(log_view);
        drop(flow_view);
        console.shutdown();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            messages = stats.messages_received,
            "Session shutdown complete"
        );

        Ok(stats)
    }
}

/// Read line-delimited JSON from the stream and forward it as transport
/// events. Owns the sender; the channel closes when this returns.
async fn feed_transport(
    stream: TcpStream,
    tx: mpsc::Sender<TransportEvent>,
    max_messages: Option<u64>,
    counter: Arc<AtomicU64>,
) {
    if tx.send(TransportEvent::Opened).await.is_err() {
        return;
    }

    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let seen = counter.fetch_add(1, Ordering::Relaxed) + 1;
                if tx.send(TransportEvent::Message(line)).await.is_err() {
                    warn!("Transport channel closed");
                    return;
                }
                if let Some(max) = max_messages {
                    if seen >= max {
                        info!(messages = seen, "Reached max messages limit");
                        break;
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                let _ = tx.send(TransportEvent::Error(e.to_string())).await;
                break;
            }
        }
    }

    let _ = tx.send(TransportEvent::Closed).await;
}
