//! # Dispatcher
//!
//! The single ordered action-delivery bus of the console core.
//!
//! Responsibilities:
//! - Deliver every dispatched action to all registered subscribers,
//!   synchronously, in registration order
//! - Stamp the action source at the two dispatch entry points
//! - Isolate subscriber failures so one bad store cannot starve the rest
//!
//! Also home of the generic [`Emitter`] event channel composed into every
//! store and view.

pub mod dispatcher;
pub mod emitter;
pub mod metrics;

pub use contracts::{Action, ActionPayload, ActionSource};
pub use dispatcher::{Dispatcher, Subscriber, SubscriberId};
pub use emitter::{Emitter, ListenerId};
pub use metrics::{DispatchMetrics, DispatchMetricsSnapshot};
