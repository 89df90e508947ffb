//! Traffic Console Demo
//!
//! Demonstrates wiring the console core, replaying a synthetic stream of
//! intercepted traffic through the connection adapter, and reconciling a
//! bulk snapshot against entries that raced ahead of it.
//!
//! Run with: cargo run --bin traffic_console

use std::time::Duration;

use connection::{ConnectionAdapter, TransportEvent};
use contracts::{ActionPayload, Flow, LogEntry, LogLevel, Request, Response, SettingsPatch};
use stores::{Console, FlowEvent};
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Traffic Console Demo");

    // ==== Stage 1: Wire the console core ====
    let console = Console::default();
    let log_view = console.event_log().get_view(None);
    let flow_view = console.flows().get_view(None);

    console.flows().events().add_listener(|event| match event {
        FlowEvent::Added(flow) => info!(
            method = %flow.request.method,
            url = %flow.request.url(),
            "Flow intercepted"
        ),
        FlowEvent::Updated(flow) => info!(
            url = %flow.request.url(),
            status = flow.response.as_ref().map(|r| r.status_code),
            "Flow updated"
        ),
    });

    // ==== Stage 2: Start the connection adapter ====
    let (tx, rx) = mpsc::channel::<TransportEvent>(64);
    let adapter = ConnectionAdapter::new(console.dispatcher().clone());
    let adapter_handle = tokio::spawn(adapter.run(rx));

    // ==== Stage 3: Replay a synthetic traffic stream ====
    tx.send(TransportEvent::Opened).await?;

    let mut flows = Vec::new();
    for (i, path) in ["/", "/login", "/api/flows", "/static/app.js"]
        .iter()
        .enumerate()
    {
        let flow = Flow::new(Request {
            method: "GET".into(),
            scheme: "https".into(),
            host: "demo.internal".into(),
            path: (*path).into(),
            timestamp_start: 100.0 + i as f64,
            content: None,
        });
        tx.send(wire(&ActionPayload::AddFlow { data: flow.clone() }))
            .await?;
        tx.send(wire(&ActionPayload::AddEvent {
            data: LogEntry::remote(i as u64 + 1, format!("GET {path}"), LogLevel::Info),
        }))
        .await?;
        flows.push(flow);
    }

    // Responses come back for the first two flows.
    for (i, flow) in flows.iter().take(2).enumerate() {
        let mut completed = flow.clone();
        completed.response = Some(Response {
            status_code: if i == 0 { 200 } else { 302 },
            reason: if i == 0 { "OK" } else { "Found" }.into(),
            timestamp_end: flow.request.timestamp_start + 0.2,
            content: None,
        });
        tx.send(wire(&ActionPayload::UpdateFlow { data: completed }))
            .await?;
    }

    // A malformed message is dropped at the boundary without disturbing the rest.
    tx.send(TransportEvent::Message("{truncated".into())).await?;

    tx.send(TransportEvent::Closed).await?;
    drop(tx);
    tokio::time::timeout(Duration::from_secs(5), adapter_handle).await??;

    // ==== Stage 4: Reconcile a bulk snapshot ====
    // The server snapshot covers ids 1..=3; the view already holds id 4,
    // which must survive the merge behind the snapshot.
    log_view.add_bulk(
        (1..=3)
            .map(|id| LogEntry::remote(id, format!("snapshot entry {id}"), LogLevel::Info))
            .collect(),
    );

    // A UI-originated settings change applies optimistically.
    console.update_settings(&SettingsPatch::show_event_log(false));

    // ==== Stage 5: Report and shut down ====
    info!(
        flows = flow_view.get_all().len(),
        with_response = flow_view
            .get_all()
            .iter()
            .filter(|f| f.response.is_some())
            .count(),
        log_entries = log_view.get_all().len(),
        show_event_log = console.settings().get_all().show_event_log,
        dispatched = console.dispatcher().metrics().dispatched(),
        "Final console state"
    );

    drop(log_view);
    drop(flow_view);
    console.shutdown();

    info!("Traffic Console Demo finished");
    Ok(())
}

fn wire(payload: &ActionPayload) -> TransportEvent {
    TransportEvent::Message(serde_json::to_string(payload).expect("payload serializes"))
}
