//! # Integration Tests
//!
//! End-to-end tests for the console core.
//!
//! Covers:
//! - Transport-to-view data flow over the full wiring
//! - Bulk snapshot reconciliation racing incremental delivery
//! - Optimistic settings updates followed by server echoes
//! - Malformed payload rejection at the boundary

#[cfg(test)]
mod contract_tests {
    use contracts::ActionPayload;

    #[test]
    fn test_wire_tags_round_trip() {
        let payload = ActionPayload::UpdateSettings {
            settings: contracts::Settings::default(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        let decoded: ActionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.type_name(), "update_settings");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::time::Duration;

    use connection::{ConnectionAdapter, TransportEvent};
    use contracts::{ActionPayload, Flow, LogEntry, LogLevel, Request, Response, SettingsPatch};
    use stores::Console;
    use tokio::sync::mpsc;

    fn flow(ts: f64) -> Flow {
        Flow::new(Request {
            method: "GET".into(),
            scheme: "https".into(),
            host: "example.com".into(),
            path: "/index.html".into(),
            timestamp_start: ts,
            content: None,
        })
    }

    fn wire(payload: &ActionPayload) -> TransportEvent {
        TransportEvent::Message(serde_json::to_string(payload).unwrap())
    }

    /// End-to-end test: transport events -> adapter -> dispatcher -> stores -> views
    #[tokio::test]
    async fn test_e2e_transport_to_views() {
        let console = Console::default();
        let log_view = console.event_log().get_view(None);
        let flow_view = console.flows().get_view(None);

        let (tx, rx) = mpsc::channel::<TransportEvent>(16);
        let adapter = ConnectionAdapter::new(console.dispatcher().clone());
        let adapter_handle = tokio::spawn(adapter.run(rx));

        // A flow appears, then completes with a response.
        let intercepted = flow(100.0);
        let mut completed = intercepted.clone();
        completed.response = Some(Response {
            status_code: 200,
            reason: "OK".into(),
            timestamp_end: 100.25,
            content: None,
        });

        tx.send(TransportEvent::Opened).await.unwrap();
        tx.send(wire(&ActionPayload::AddEvent {
            data: LogEntry::remote(1, "client connect", LogLevel::Info),
        }))
        .await
        .unwrap();
        tx.send(wire(&ActionPayload::AddFlow {
            data: intercepted.clone(),
        }))
        .await
        .unwrap();
        tx.send(wire(&ActionPayload::UpdateFlow {
            data: completed.clone(),
        }))
        .await
        .unwrap();
        tx.send(TransportEvent::Closed).await.unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), adapter_handle)
            .await
            .expect("adapter timed out")
            .unwrap();

        // One flow, updated in place.
        let flows = flow_view.get_all();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].id, intercepted.id);
        assert_eq!(flows[0].response.as_ref().unwrap().status_code, 200);

        // The remote entry plus the adapter's closure notice.
        let log = log_view.get_all();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].id, Some(1));
        assert_eq!(log[1].id, None);
        assert_eq!(log[1].message, "Stream connection closed.");

        console.shutdown();
    }

    /// Incremental entries that arrive while a bulk retrieval is in flight
    /// must survive the snapshot merge, in order.
    #[tokio::test]
    async fn test_bulk_snapshot_racing_incremental_delivery() {
        let console = Console::default();
        let log_view = console.event_log().get_view(None);

        let (tx, rx) = mpsc::channel::<TransportEvent>(16);
        let adapter = ConnectionAdapter::new(console.dispatcher().clone());
        let adapter_handle = tokio::spawn(adapter.run(rx));

        // Entries 5 and 6 race ahead of the snapshot fetch.
        for id in [5u64, 6] {
            tx.send(wire(&ActionPayload::AddEvent {
                data: LogEntry::remote(id, format!("entry {id}"), LogLevel::Info),
            }))
            .await
            .unwrap();
        }
        drop(tx);
        tokio::time::timeout(Duration::from_secs(5), adapter_handle)
            .await
            .expect("adapter timed out")
            .unwrap();

        // The snapshot resolves covering ids 1..=5.
        log_view.add_bulk(
            (1..=5)
                .map(|id| LogEntry::remote(id, format!("entry {id}"), LogLevel::Info))
                .collect(),
        );

        let ids: Vec<_> = log_view.get_all().iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            vec![Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)]
        );

        console.shutdown();
    }

    /// A flow update that lands before the snapshot fetch resolves must not
    /// be clobbered by the stale snapshot.
    #[test]
    fn test_flow_snapshot_preserves_raced_update() {
        let console = Console::default();
        let flow_view = console.flows().get_view(None);

        let known = flow(1.0);
        let mut updated = known.clone();
        updated.error = Some("connection reset".into());

        console
            .dispatcher()
            .dispatch_server_action(ActionPayload::UpdateFlow {
                data: updated.clone(),
            });

        // Stale snapshot without the error, plus a flow the view never saw.
        let other = flow(2.0);
        flow_view.add_bulk(vec![known.clone(), other.clone()]);

        let flows = flow_view.get_all();
        assert_eq!(flows.len(), 2);
        let merged = flows.iter().find(|f| f.id == known.id).unwrap();
        assert_eq!(merged.error.as_deref(), Some("connection reset"));

        console.shutdown();
    }

    /// An optimistic UI update applies immediately, and a later server echo
    /// replaces the settings wholesale.
    #[test]
    fn test_optimistic_settings_update_then_server_echo() {
        let console = Console::default();

        console.update_settings(&SettingsPatch::show_event_log(false));
        assert!(!console.settings().get_all().show_event_log);

        let mut echoed = console.settings().get_all();
        echoed.show_event_log = false;
        echoed.version = "0.13".into();
        console
            .dispatcher()
            .dispatch_server_action(ActionPayload::UpdateSettings { settings: echoed });

        let settings = console.settings().get_all();
        assert!(!settings.show_event_log);
        assert_eq!(settings.version, "0.13");

        console.shutdown();
    }

    /// Garbage on the wire is dropped at the boundary; valid messages around
    /// it still land.
    #[tokio::test]
    async fn test_malformed_payloads_rejected_end_to_end() {
        let console = Console::default();
        let log_view = console.event_log().get_view(None);

        let (tx, rx) = mpsc::channel::<TransportEvent>(16);
        let adapter = ConnectionAdapter::new(console.dispatcher().clone());
        let adapter_handle = tokio::spawn(adapter.run(rx));

        tx.send(TransportEvent::Message("{not json".into()))
            .await
            .unwrap();
        tx.send(TransportEvent::Message(
            r#"{"type":"unknown_action","data":{}}"#.into(),
        ))
        .await
        .unwrap();
        tx.send(wire(&ActionPayload::AddEvent {
            data: LogEntry::remote(1, "still here", LogLevel::Info),
        }))
        .await
        .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), adapter_handle)
            .await
            .expect("adapter timed out")
            .unwrap();

        let log = log_view.get_all();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].message, "still here");

        // Only the valid message was dispatched from the server entry point.
        assert_eq!(console.dispatcher().metrics().server_actions(), 1);

        console.shutdown();
    }

    /// A console built from a parsed configuration starts with the
    /// configured settings.
    #[test]
    fn test_console_from_loaded_config() {
        let toml = r#"
[stream]
host = "127.0.0.1"
port = 8081

[settings]
version = "0.12"
show_event_log = false
mode = "regular"
"#;
        let config =
            config_loader::ConfigLoader::load_from_str(toml, config_loader::ConfigFormat::Toml)
                .unwrap();
        let console = Console::new(config.settings.clone());
        assert_eq!(console.settings().get_all(), config.settings);
        console.shutdown();
    }
}
