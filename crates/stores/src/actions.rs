//! Local UI action entry points
//!
//! These are the only producers of view-origin actions. Settings updates
//! are applied optimistically on the client before any server confirmation.

use contracts::{ActionPayload, LogEntry, LogLevel, SettingsPatch};
use dispatcher::Dispatcher;

use crate::settings::SettingsStore;

/// Entry points for settings changes made in the UI.
pub struct SettingsActions;

impl SettingsActions {
    /// Merge `patch` into the store's current settings and dispatch the full
    /// merged object as a view-origin `update_settings`.
    pub fn update(dispatcher: &Dispatcher, store: &SettingsStore, patch: &SettingsPatch) {
        let settings = store.get_all().merged(patch);
        dispatcher.dispatch_view_action(ActionPayload::UpdateSettings { settings });
    }
}

/// Entry points for log entries created by the UI itself.
pub struct EventLogActions;

impl EventLogActions {
    /// Dispatch a view-origin `add_event` with UI source and the given
    /// level.
    pub fn add_event(dispatcher: &Dispatcher, message: impl Into<String>, level: LogLevel) {
        dispatcher.dispatch_view_action(ActionPayload::AddEvent {
            data: LogEntry::ui(message, level),
        });
    }

    /// `add_event` with the default `info` level.
    pub fn add_info(dispatcher: &Dispatcher, message: impl Into<String>) {
        Self::add_event(dispatcher, message, LogLevel::Info);
    }
}
