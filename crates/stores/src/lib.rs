//! # Stores
//!
//! Per-domain authoritative state and its consumer-facing projections.
//!
//! Responsibilities:
//! - Subscribe each store to the action bus and re-emit domain events
//! - Hand out live or frozen views with bulk/incremental reconciliation
//! - Provide the local UI action entry points
//! - Wire everything together in the [`Console`] application context

pub mod actions;
pub mod console;
pub mod event_log;
pub mod flow;
pub mod settings;

pub use actions::{EventLogActions, SettingsActions};
pub use console::Console;
pub use event_log::{EventLogStore, EventLogView};
pub use flow::{FlowEvent, FlowStore, FlowView};
pub use settings::SettingsStore;
