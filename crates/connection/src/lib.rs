//! # Connection
//!
//! Adapter between the persistent stream transport and the action bus.
//!
//! Responsibilities:
//! - Decode inbound messages into typed action payloads
//! - Dispatch decoded payloads as server-origin actions
//! - Surface transport errors/closure as UI-origin event-log entries
//!
//! The transport itself (framing, reconnect policy) is an external
//! collaborator; it feeds this crate [`TransportEvent`]s over a channel.

pub mod adapter;

pub use adapter::{ConnectionAdapter, TransportEvent};
