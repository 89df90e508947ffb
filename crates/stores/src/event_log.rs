//! EventLogStore and EventLogView - bulk/incremental log reconciliation
//!
//! The store is a stateless pass-through: it re-emits `add_event` data on a
//! domain channel and holds no collection. The collections live in the
//! views, because a live view must keep ingesting entries that arrive while
//! a bulk retrieval is still in flight.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use contracts::{Action, ActionPayload, ConsoleError, EventId, LogEntry};
use dispatcher::{Emitter, ListenerId, Subscriber};
use observability::record_store_change;

/// Pass-through store for event-log entries.
pub struct EventLogStore {
    entries: Emitter<LogEntry>,
}

impl EventLogStore {
    pub fn new() -> Self {
        Self {
            entries: Emitter::new(),
        }
    }

    /// Domain channel carrying each `add_event` entry as it is applied.
    pub fn entries(&self) -> &Emitter<LogEntry> {
        &self.entries
    }

    /// Obtain a projection of the log.
    ///
    /// With `since` absent the view is live: it subscribes to the entries
    /// channel and ingests every subsequent entry. With `since` present the
    /// view is frozen, populated only by an external bulk retrieval.
    pub fn get_view(self: &Arc<Self>, since: Option<EventId>) -> EventLogView {
        EventLogView::new(self.clone(), since.is_none())
    }
}

impl Default for EventLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for EventLogStore {
    fn name(&self) -> &str {
        "event_log"
    }

    fn handle(&self, action: &Action) -> Result<(), ConsoleError> {
        match &action.payload {
            ActionPayload::AddEvent { data } => {
                record_store_change("event_log");
                self.entries.emit(data);
            }
            ActionPayload::UpdateSettings { .. }
            | ActionPayload::AddFlow { .. }
            | ActionPayload::UpdateFlow { .. } => {}
        }
        Ok(())
    }
}

/// Shared state between a view handle and its store subscription.
struct EventLogViewState {
    log: Mutex<Vec<LogEntry>>,
    on_change: Emitter<()>,
}

impl EventLogViewState {
    fn add(&self, entry: LogEntry) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        // Emit with the log lock released; listeners re-pull get_all().
        self.on_change.emit(&());
    }
}

/// Per-consumer projection of the event log.
///
/// Owns its store subscription and releases it on [`close`](Self::close) or
/// drop, so an unmounted consumer cannot leak listeners.
pub struct EventLogView {
    state: Arc<EventLogViewState>,
    store: Arc<EventLogStore>,
    subscription: Option<ListenerId>,
    live: bool,
}

impl EventLogView {
    fn new(store: Arc<EventLogStore>, live: bool) -> Self {
        let state = Arc::new(EventLogViewState {
            log: Mutex::new(Vec::new()),
            on_change: Emitter::new(),
        });

        let subscription = live.then(|| {
            let state = state.clone();
            store
                .entries()
                .add_listener(move |entry: &LogEntry| state.add(entry.clone()))
        });

        Self {
            state,
            store,
            subscription,
            live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Current visible log, by value.
    pub fn get_all(&self) -> Vec<LogEntry> {
        self.state
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change channel toward the view's UI consumer.
    pub fn on_change(&self) -> &Emitter<()> {
        &self.state.on_change
    }

    /// Append one incrementally received entry.
    ///
    /// No dedup against a future bulk fetch is needed here; `add_bulk`
    /// performs the reconciliation when the snapshot lands.
    pub fn add(&self, entry: LogEntry) {
        self.state.add(entry);
    }

    /// Reconcile a bulk snapshot against entries already received.
    ///
    /// The snapshot (sorted ascending by id) is authoritative up to its last
    /// id; in-memory entries with a strictly greater id are carried over
    /// behind it in their original order, everything else is discarded.
    pub fn add_bulk(&self, snapshot: Vec<LogEntry>) {
        let Some(last_id) = snapshot.last().and_then(|entry| entry.id) else {
            warn!("Bulk log snapshot empty or missing trailing id, ignoring");
            return;
        };

        {
            let mut log = self
                .state
                .log
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let carry = log
                .iter()
                .filter(|entry| entry.id.is_some_and(|id| id > last_id))
                .cloned();
            let mut merged = snapshot.clone();
            merged.extend(carry);
            *log = merged;
        }
        self.state.on_change.emit(&());
    }

    /// Release the store subscription. Idempotent.
    pub fn close(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.entries().remove_listener(id);
        }
    }
}

impl Drop for EventLogView {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ActionSource, LogLevel};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn remote(id: EventId, message: &str) -> LogEntry {
        LogEntry::remote(id, message, LogLevel::Info)
    }

    fn dispatch_entry(store: &EventLogStore, entry: LogEntry) {
        store
            .handle(&Action::new(
                ActionSource::Server,
                ActionPayload::AddEvent { data: entry },
            ))
            .unwrap();
    }

    #[test]
    fn test_live_view_ingests_dispatched_entries() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);

        dispatch_entry(&store, remote(1, "a"));
        dispatch_entry(&store, remote(2, "b"));

        let log = view.get_all();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].id, Some(1));
        assert_eq!(log[1].id, Some(2));
    }

    #[test]
    fn test_frozen_view_never_subscribes() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(Some(10));
        assert!(!view.is_live());

        dispatch_entry(&store, remote(11, "missed"));
        assert!(view.get_all().is_empty());

        view.add_bulk(vec![remote(1, "a"), remote(2, "b")]);
        assert_eq!(view.get_all().len(), 2);
    }

    #[test]
    fn test_bulk_carries_newer_entries_in_order() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);

        // Incremental entries that raced ahead of the snapshot.
        view.add(remote(5, "five"));
        view.add(remote(6, "six"));

        view.add_bulk(vec![
            remote(1, "one"),
            remote(2, "two"),
            remote(5, "five"),
        ]);

        let ids: Vec<_> = view.get_all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(5), Some(6)]);
    }

    #[test]
    fn test_bulk_is_idempotent_without_intervening_adds() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);
        view.add(remote(4, "four"));

        let snapshot = vec![remote(1, "one"), remote(2, "two"), remote(3, "three")];
        view.add_bulk(snapshot.clone());
        let first = view.get_all();
        view.add_bulk(snapshot);
        assert_eq!(view.get_all(), first);
    }

    #[test]
    fn test_ui_entries_superseded_by_snapshot() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);
        view.add(LogEntry::ui("stream connection error", LogLevel::Warn));

        view.add_bulk(vec![remote(1, "one")]);
        let log = view.get_all();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].id, Some(1));
    }

    #[test]
    fn test_empty_snapshot_leaves_log_untouched() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);
        view.add(remote(1, "a"));

        view.add_bulk(Vec::new());
        assert_eq!(view.get_all().len(), 1);
    }

    #[test]
    fn test_change_fires_per_add_and_per_bulk() {
        let store = Arc::new(EventLogStore::new());
        let view = store.get_view(None);
        let fired = Arc::new(AtomicU64::new(0));
        let fired_ref = fired.clone();
        view.on_change().add_listener(move |_| {
            fired_ref.fetch_add(1, Ordering::SeqCst);
        });

        view.add(remote(1, "a"));
        view.add_bulk(vec![remote(1, "a"), remote(2, "b")]);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_close_detaches_listener() {
        let store = Arc::new(EventLogStore::new());
        let mut view = store.get_view(None);
        assert_eq!(store.entries().listener_count(), 1);

        view.close();
        assert_eq!(store.entries().listener_count(), 0);

        dispatch_entry(&store, remote(1, "after close"));
        assert!(view.get_all().is_empty());
    }

    #[test]
    fn test_drop_releases_subscription() {
        let store = Arc::new(EventLogStore::new());
        {
            let _view = store.get_view(None);
            assert_eq!(store.entries().listener_count(), 1);
        }
        assert_eq!(store.entries().listener_count(), 0);
    }
}
