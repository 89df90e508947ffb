//! Emitter - generic event channel composed into stores and views
//!
//! One reusable abstraction instead of per-type listener plumbing;
//! listeners are disposed through the `ListenerId` capability handed out
//! at registration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Disposal capability for one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Synchronous multi-listener event channel.
///
/// Listeners are invoked in registration order over a snapshot taken at
/// emit start, so listener changes made while an event is being delivered
/// apply only to subsequent emits.
pub struct Emitter<E> {
    listeners: Mutex<Vec<(ListenerId, Listener<E>)>>,
    next_id: AtomicU64,
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a listener; returns the handle needed to remove it.
    pub fn add_listener(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener.
    ///
    /// Removing a listener that is not present is a no-op returning `false`.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        match listeners.iter().position(|(lid, _)| *lid == id) {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Invoke every listener with `event`, in registration order.
    pub fn emit(&self, event: &E) {
        // Snapshot outside the lock so listeners may add/remove listeners
        // on this same emitter without deadlocking.
        let snapshot: Vec<Listener<E>> = self.lock().iter().map(|(_, l)| l.clone()).collect();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Listener<E>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}
