//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery counters for the action bus
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total actions dispatched
    dispatched: AtomicU64,
    /// Actions entering through the view entry point
    view_actions: AtomicU64,
    /// Actions entering through the server entry point
    server_actions: AtomicU64,
    /// Subscriber handle() failures (isolated, delivery continued)
    subscriber_errors: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total dispatched count
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// Increment total dispatched count
    pub fn inc_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Get view-origin action count
    pub fn view_actions(&self) -> u64 {
        self.view_actions.load(Ordering::Relaxed)
    }

    /// Increment view-origin action count
    pub fn inc_view_actions(&self) {
        self.view_actions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get server-origin action count
    pub fn server_actions(&self) -> u64 {
        self.server_actions.load(Ordering::Relaxed)
    }

    /// Increment server-origin action count
    pub fn inc_server_actions(&self) {
        self.server_actions.fetch_add(1, Ordering::Relaxed);
    }

    /// Get subscriber error count
    pub fn subscriber_errors(&self) -> u64 {
        self.subscriber_errors.load(Ordering::Relaxed)
    }

    /// Increment subscriber error count
    pub fn inc_subscriber_errors(&self) {
        self.subscriber_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> DispatchMetricsSnapshot {
        DispatchMetricsSnapshot {
            dispatched: self.dispatched(),
            view_actions: self.view_actions(),
            server_actions: self.server_actions(),
            subscriber_errors: self.subscriber_errors(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy)]
pub struct DispatchMetricsSnapshot {
    pub dispatched: u64,
    pub view_actions: u64,
    pub server_actions: u64,
    pub subscriber_errors: u64,
}
