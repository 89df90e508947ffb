//! Dispatcher - ordered synchronous fan-out of actions to subscribers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error};

use contracts::{Action, ActionPayload, ActionSource, ConsoleError};

use crate::metrics::DispatchMetrics;

/// A synchronous consumer of dispatched actions, typically a store.
///
/// `handle` runs to completion on the dispatching thread. Returning an error
/// does not abort delivery to later subscribers; the dispatcher logs it and
/// moves on (see [`Dispatcher::dispatch`]).
pub trait Subscriber: Send + Sync {
    /// Name used in logs and metrics when this subscriber fails.
    fn name(&self) -> &str;

    /// Inspect the action and mutate internal state as needed.
    fn handle(&self, action: &Action) -> Result<(), ConsoleError>;
}

/// Disposal capability returned by [`Dispatcher::register`].
///
/// Unregistration keys on this handle, never on subscriber identity, so two
/// registrations of the same subscriber are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// The single ordered bus through which all actions flow to all stores.
///
/// Delivery contract:
/// - subscribers are invoked in registration order, synchronously, with the
///   same action
/// - a dispatch iterates a snapshot of the list taken at dispatch start, so
///   a subscriber registered mid-dispatch never observes the in-flight
///   action, and unregistration mid-dispatch does not shift delivery
/// - a failing subscriber is logged and counted; later subscribers still
///   receive the action
pub struct Dispatcher {
    registry: Mutex<Vec<(SubscriberId, Arc<dyn Subscriber>)>>,
    next_id: AtomicU64,
    metrics: Arc<DispatchMetrics>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Add a subscriber; it will see every action dispatched after this call.
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock_registry().push((id, subscriber));
        id
    }

    /// Remove exactly the subscriber registered under `id`.
    ///
    /// Returns `false` if the id is not currently registered.
    pub fn unregister(&self, id: SubscriberId) -> bool {
        let mut registry = self.lock_registry();
        match registry.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                registry.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock_registry().len()
    }

    /// Delivery counters.
    pub fn metrics(&self) -> &Arc<DispatchMetrics> {
        &self.metrics
    }

    /// Dispatch an action originating from a local UI interaction.
    ///
    /// This and [`dispatch_server_action`](Self::dispatch_server_action) are
    /// the only call sites that stamp the action source.
    pub fn dispatch_view_action(&self, payload: ActionPayload) {
        self.metrics.inc_view_actions();
        self.dispatch(Action::new(ActionSource::View, payload));
    }

    /// Dispatch an action received from the remote stream.
    pub fn dispatch_server_action(&self, payload: ActionPayload) {
        self.metrics.inc_server_actions();
        self.dispatch(Action::new(ActionSource::Server, payload));
    }

    fn dispatch(&self, action: Action) {
        debug!(
            action = action.payload.type_name(),
            source = ?action.source,
            "dispatch"
        );
        self.metrics.inc_dispatched();

        // Stable snapshot: mid-dispatch register/unregister must not be
        // observed by this delivery.
        let snapshot: Vec<_> = self.lock_registry().clone();

        for (id, subscriber) in snapshot {
            if let Err(e) = subscriber.handle(&action) {
                self.metrics.inc_subscriber_errors();
                error!(
                    subscriber = subscriber.name(),
                    subscriber_id = ?id,
                    action = action.payload.type_name(),
                    error = %e,
                    "Subscriber failed, continuing delivery"
                );
            }
        }
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriberId, Arc<dyn Subscriber>)>> {
        // A subscriber panic must not wedge the bus for the process lifetime.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{LogEntry, LogLevel};
    use std::sync::Mutex;

    struct Recorder {
        name: String,
        seen: Mutex<Vec<(ActionSource, String)>>,
        fail: bool,
    }

    impl Recorder {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn seen(&self) -> Vec<(ActionSource, String)> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Subscriber for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn handle(&self, action: &Action) -> Result<(), ConsoleError> {
            self.seen
                .lock()
                .unwrap()
                .push((action.source, action.payload.type_name().to_string()));
            if self.fail {
                return Err(ConsoleError::store(&self.name, "induced failure"));
            }
            Ok(())
        }
    }

    fn add_event_payload(message: &str) -> ActionPayload {
        ActionPayload::AddEvent {
            data: LogEntry::remote(1, message, LogLevel::Info),
        }
    }

    #[test]
    fn test_delivery_in_registration_order() {
        struct Tagged {
            tag: &'static str,
            order: Arc<Mutex<Vec<&'static str>>>,
        }

        impl Subscriber for Tagged {
            fn name(&self) -> &str {
                self.tag
            }

            fn handle(&self, _action: &Action) -> Result<(), ConsoleError> {
                self.order.lock().unwrap().push(self.tag);
                Ok(())
            }
        }

        let dispatcher = Dispatcher::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            dispatcher.register(Arc::new(Tagged {
                tag,
                order: order.clone(),
            }));
        }

        dispatcher.dispatch_server_action(add_event_payload("a"));

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_source_stamped_by_entry_point() {
        let dispatcher = Dispatcher::new();
        let recorder = Recorder::new("rec");
        dispatcher.register(recorder.clone());

        dispatcher.dispatch_view_action(add_event_payload("ui"));
        dispatcher.dispatch_server_action(add_event_payload("srv"));

        let seen = recorder.seen();
        assert_eq!(seen[0].0, ActionSource::View);
        assert_eq!(seen[1].0, ActionSource::Server);
    }

    #[test]
    fn test_unregister_removes_exactly_one() {
        let dispatcher = Dispatcher::new();
        let keep = Recorder::new("keep");
        let drop_me = Recorder::new("drop");
        dispatcher.register(keep.clone());
        let id = dispatcher.register(drop_me.clone());

        assert!(dispatcher.unregister(id));
        // Second removal of the same handle is a no-op.
        assert!(!dispatcher.unregister(id));

        dispatcher.dispatch_server_action(add_event_payload("x"));
        assert_eq!(keep.seen().len(), 1);
        assert!(drop_me.seen().is_empty());
    }

    #[test]
    fn test_failing_subscriber_does_not_abort_delivery() {
        let dispatcher = Dispatcher::new();
        let bad = Recorder::failing("bad");
        let good = Recorder::new("good");
        dispatcher.register(bad);
        dispatcher.register(good.clone());

        dispatcher.dispatch_server_action(add_event_payload("x"));

        assert_eq!(good.seen().len(), 1);
        assert_eq!(dispatcher.metrics().snapshot().subscriber_errors, 1);
    }

    #[test]
    fn test_registration_during_dispatch_not_observed_in_flight() {
        struct Registering {
            dispatcher: Arc<Dispatcher>,
            late: Arc<Recorder>,
        }

        impl Subscriber for Registering {
            fn name(&self) -> &str {
                "registering"
            }

            fn handle(&self, _action: &Action) -> Result<(), ConsoleError> {
                self.dispatcher.register(self.late.clone());
                Ok(())
            }
        }

        let dispatcher = Arc::new(Dispatcher::new());
        let late = Recorder::new("late");
        dispatcher.register(Arc::new(Registering {
            dispatcher: dispatcher.clone(),
            late: late.clone(),
        }));

        dispatcher.dispatch_server_action(add_event_payload("first"));
        assert!(late.seen().is_empty(), "late subscriber saw in-flight action");

        dispatcher.dispatch_server_action(add_event_payload("second"));
        assert_eq!(late.seen().len(), 1);
    }

    #[test]
    fn test_metrics_count_sources() {
        let dispatcher = Dispatcher::new();
        dispatcher.dispatch_view_action(add_event_payload("a"));
        dispatcher.dispatch_server_action(add_event_payload("b"));
        dispatcher.dispatch_server_action(add_event_payload("c"));

        let snapshot = dispatcher.metrics().snapshot();
        assert_eq!(snapshot.dispatched, 3);
        assert_eq!(snapshot.view_actions, 1);
        assert_eq!(snapshot.server_actions, 2);
    }
}
