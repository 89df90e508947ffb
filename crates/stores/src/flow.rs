//! FlowStore and FlowView - upsert reconciliation for intercepted flows
//!
//! Same pass-through pattern as the event log store, but the view's bulk
//! merge differs: flow collections are not append-only by id, so a snapshot
//! replaces the collection and previously-held flows are replayed through
//! the upsert.

use std::sync::{Arc, Mutex, PoisonError};

use contracts::{Action, ActionPayload, ConsoleError, Flow};
use dispatcher::{Emitter, ListenerId, Subscriber};
use observability::record_store_change;

/// Domain event re-emitted by the flow store, preserving whether the bus
/// action announced a brand-new flow or an update to a known one.
#[derive(Debug, Clone)]
pub enum FlowEvent {
    Added(Flow),
    Updated(Flow),
}

impl FlowEvent {
    pub fn flow(&self) -> &Flow {
        match self {
            Self::Added(flow) | Self::Updated(flow) => flow,
        }
    }
}

/// Pass-through store for flow records.
pub struct FlowStore {
    events: Emitter<FlowEvent>,
}

impl FlowStore {
    pub fn new() -> Self {
        Self {
            events: Emitter::new(),
        }
    }

    /// Domain channel carrying each applied `add_flow` / `update_flow`.
    pub fn events(&self) -> &Emitter<FlowEvent> {
        &self.events
    }

    /// Obtain a projection of the flow collection; `since` present yields a
    /// frozen view to be fed once by an external bulk retrieval.
    pub fn get_view(self: &Arc<Self>, since: Option<f64>) -> FlowView {
        FlowView::new(self.clone(), since.is_none())
    }
}

impl Default for FlowStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscriber for FlowStore {
    fn name(&self) -> &str {
        "flows"
    }

    fn handle(&self, action: &Action) -> Result<(), ConsoleError> {
        match &action.payload {
            ActionPayload::AddFlow { data } => {
                record_store_change("flows");
                self.events.emit(&FlowEvent::Added(data.clone()));
            }
            ActionPayload::UpdateFlow { data } => {
                record_store_change("flows");
                self.events.emit(&FlowEvent::Updated(data.clone()));
            }
            ActionPayload::UpdateSettings { .. } | ActionPayload::AddEvent { .. } => {}
        }
        Ok(())
    }
}

struct FlowViewState {
    flows: Mutex<Vec<Flow>>,
    on_change: Emitter<()>,
}

impl FlowViewState {
    /// Upsert keyed by flow id: replace in place preserving position, or
    /// append when the key is new.
    fn update(&self, flow: Flow) {
        {
            let mut flows = self.flows.lock().unwrap_or_else(PoisonError::into_inner);
            match flows.iter().position(|f| f.id == flow.id) {
                Some(index) => flows[index] = flow,
                None => flows.push(flow),
            }
        }
        self.on_change.emit(&());
    }
}

/// Per-consumer projection of the flow collection.
pub struct FlowView {
    state: Arc<FlowViewState>,
    store: Arc<FlowStore>,
    subscription: Option<ListenerId>,
    live: bool,
}

impl FlowView {
    fn new(store: Arc<FlowStore>, live: bool) -> Self {
        let state = Arc::new(FlowViewState {
            flows: Mutex::new(Vec::new()),
            on_change: Emitter::new(),
        });

        // Added and Updated collapse to the same upsert here; the split
        // channel exists for consumers that need to tell them apart.
        let subscription = live.then(|| {
            let state = state.clone();
            store
                .events()
                .add_listener(move |event: &FlowEvent| state.update(event.flow().clone()))
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

    /// Current flow collection, by value.
    pub fn get_all(&self) -> Vec<Flow> {
        self.state
            .flows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change channel toward the view's UI consumer.
    pub fn on_change(&self) -> &Emitter<()> {
        &self.state.on_change
    }

    /// An add is an upsert expected, but not required, to be a fresh key.
    pub fn add(&self, flow: Flow) {
        self.update(flow);
    }

    /// Upsert one flow and notify.
    pub fn update(&self, flow: Flow) {
        self.state.update(flow);
    }

    /// Reconcile a bulk snapshot.
    ///
    /// The snapshot replaces the collection outright; every previously-held
    /// flow is then replayed through the upsert in its original order, so
    /// updates that raced ahead of the snapshot are not lost. Replaying an
    /// update the snapshot already reflects is harmless (upsert).
    pub fn add_bulk(&self, flows: Vec<Flow>) {
        let prior = {
            let mut current = self
                .state
                .flows
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, flows)
        };
        self.state.on_change.emit(&());

        for flow in prior {
            self.state.update(flow);
        }
    }

    /// Release the store subscription. Idempotent.
    pub fn close(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.events().remove_listener(id);
        }
    }
}

impl Drop for FlowView {
    fn drop(&mut self) {
        self.close();
    }
}
