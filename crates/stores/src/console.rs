//! Console - top-level application context
//!
//! Explicitly constructed, dependency-injected: builds the dispatcher and
//! the stores, registers the stores on the bus in a fixed order, and
//! unregisters them on shutdown. No module-level singletons.

use std::sync::Arc;

use tracing::{debug, info};

use contracts::{LogLevel, Settings, SettingsPatch};
use dispatcher::{Dispatcher, SubscriberId};

use crate::{
    actions::{EventLogActions, SettingsActions},
    event_log::EventLogStore,
    flow::FlowStore,
    settings::SettingsStore,
};

/// The wired-up console core: one dispatcher, one store per domain.
pub struct Console {
    dispatcher: Arc<Dispatcher>,
    settings: Arc<SettingsStore>,
    event_log: Arc<EventLogStore>,
    flows: Arc<FlowStore>,
    registrations: Vec<SubscriberId>,
}

impl Console {
    /// Build and register every store.
    pub fn new(initial_settings: Settings) -> Self {
        let dispatcher = Arc::new(Dispatcher::new());
        let settings = Arc::new(SettingsStore::new(initial_settings));
        let event_log = Arc::new(EventLogStore::new());
        let flows = Arc::new(FlowStore::new());

        let registrations = vec![
            dispatcher.register(settings.clone()),
            dispatcher.register(event_log.clone()),
            dispatcher.register(flows.clone()),
        ];

        info!(stores = registrations.len(), "Console core wired");

        Self {
            dispatcher,
            settings,
            event_log,
            flows,
            registrations,
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn event_log(&self) -> &Arc<EventLogStore> {
        &self.event_log
    }

    pub fn flows(&self) -> &Arc<FlowStore> {
        &self.flows
    }

    /// Optimistically apply a settings patch from the UI.
    pub fn update_settings(&self, patch: &SettingsPatch) {
        SettingsActions::update(&self.dispatcher, &self.settings, patch);
    }

    /// Record a locally originated event-log entry.
    pub fn add_event(&self, message: impl Into<String>, level: LogLevel) {
        EventLogActions::add_event(&self.dispatcher, message, level);
    }

    /// Unregister every store from the bus.
    pub fn shutdown(mut self) {
        for id in self.registrations.drain(..) {
            self.dispatcher.unregister(id);
        }
        debug!("Console core shut down");
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ActionPayload, Flow, LogEntry, Request};

    fn flow(ts: f64) -> Flow {
        Flow::new(Request {
            method: "GET".into(),
            scheme: "https".into(),
            host: "example.com".into(),
            path: "/".into(),
            timestamp_start: ts,
            content: None,
        })
    }

    #[test]
    fn test_server_actions_reach_every_store() {
        let console = Console::default();
        let log_view = console.event_log().get_view(None);
        let flow_view = console.flows().get_view(None);

        console
            .dispatcher()
            .dispatch_server_action(ActionPayload::AddEvent {
                data: LogEntry::remote(1, "client connect", LogLevel::Info),
            });
        console
            .dispatcher()
            .dispatch_server_action(ActionPayload::AddFlow { data: flow(1.0) });

        assert_eq!(log_view.get_all().len(), 1);
        assert_eq!(flow_view.get_all().len(), 1);
    }

    #[test]
    fn test_optimistic_settings_update() {
        let console = Console::default();
        console.update_settings(&SettingsPatch::show_event_log(false));
        assert!(!console.settings().get_all().show_event_log);
    }

    #[test]
    fn test_shutdown_unregisters_stores() {
        let console = Console::default();
        let dispatcher = console.dispatcher().clone();
        assert_eq!(dispatcher.subscriber_count(), 3);

        console.shutdown();
        assert_eq!(dispatcher.subscriber_count(), 0);
    }
}
