//! Console core metric recording helpers
//!
//! Thin wrappers over the `metrics` facade so business crates record with
//! consistent names and labels.

use metrics::counter;

/// Record one action delivered through the bus.
///
/// `action_type` is the wire tag (`add_flow`, ...), `source` is `view` or
/// `server`.
pub fn record_action_dispatched(action_type: &'static str, source: &'static str) {
    counter!(
        "flowdeck_actions_dispatched_total",
        "action" => action_type,
        "source" => source
    )
    .increment(1);
}

/// Record one applied mutation on a store.
pub fn record_store_change(store: &'static str) {
    counter!("flowdeck_store_changes_total", "store" => store).increment(1);
}

/// Record an inbound payload that failed to decode as an action.
pub fn record_decode_failure() {
    counter!("flowdeck_payload_decode_failures_total").increment(1);
}

/// Record a transport lifecycle event (`opened`, `message`, `error`,
/// `closed`).
pub fn record_transport_event(kind: &'static str) {
    counter!("flowdeck_transport_events_total", "kind" => kind).increment(1);
}
