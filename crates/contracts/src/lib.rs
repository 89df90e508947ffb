//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures shared
//! by the console core. All business crates can only depend on this crate,
//! reverse dependencies are prohibited.
//!
//! ## Identity Model
//! - Event-log entries are ordered by server-assigned monotonically
//!   increasing ids; locally originated entries carry no id.
//! - Flows are keyed by a `FlowId` (UUID) assigned at flow creation.

mod action;
mod config;
mod error;
mod event;
mod flow;
mod flow_id;
mod settings;

pub use action::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use flow::*;
pub use flow_id::FlowId;
pub use settings::*;
