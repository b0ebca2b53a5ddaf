// File: crm-server/src/state.rs
// Purpose: Application state shared across handlers

use crm_core::config::AgentConfig;
use crm_sync::{Commands, DataService, EmailDefaults, PreferenceStore, SnapshotStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub commands: Commands,
    pub store: Arc<SnapshotStore>,
    pub service: Arc<dyn DataService>,
    pub agent_name: String,
}

impl AppState {
    pub fn new(
        service: Arc<dyn DataService>,
        store: Arc<SnapshotStore>,
        prefs: Arc<dyn PreferenceStore>,
        agent: &AgentConfig,
    ) -> Self {
        let commands = Commands::new(
            service.clone(),
            store.clone(),
            prefs,
            EmailDefaults::from(agent),
        );

        Self {
            commands,
            store,
            service,
            agent_name: agent.name.clone(),
        }
    }
}
