//! SettingsStore - authoritative holder of the current settings

use std::sync::{Mutex, PoisonError};

use contracts::{Action, ActionPayload, ConsoleError, Settings};
use dispatcher::{Emitter, Subscriber};
use observability::record_store_change;

/// Process-wide settings state.
///
/// Replaced wholesale on every `update_settings` action; partial merges are
/// the action originator's job (see [`crate::SettingsActions`]).
pub struct SettingsStore {
    settings: Mutex<Settings>,
    on_change: Emitter<()>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: Mutex::new(initial),
            on_change: Emitter::new(),
        }
    }

    /// Current settings, by value. Readers never observe later mutation
    /// through the returned copy.
    pub fn get_all(&self) -> Settings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Change channel; fires once per applied `update_settings`.
    pub fn on_change(&self) -> &Emitter<()> {
        &self.on_change
    }
}

impl Subscriber for SettingsStore {
    fn name(&self) -> &str {
        "settings"
    }

    fn handle(&self, action: &Action) -> Result<(), ConsoleError> {
        match &action.payload {
            ActionPayload::UpdateSettings { settings } => {
                *self
                    .settings
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = settings.clone();
                record_store_change("settings");
                self.on_change.emit(&());
            }
            ActionPayload::AddEvent { .. }
            | ActionPayload::AddFlow { .. }
            | ActionPayload::UpdateFlow { .. } => {}
        }
        Ok(())
    }
}
