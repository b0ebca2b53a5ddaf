// File: crm-sync/src/lib.rs
// Purpose: Main entry point for the crm-sync library

//! # crm-sync
//!
//! Everything between the pure derivation layer and the outside world: the
//! remote data service, the snapshot that pages read from, the listener that
//! reloads it whenever the service reports a change, the local preference
//! store, and the command handlers that validate and forward user writes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crm_sync::{spawn_change_listener, Commands, SnapshotStore, SqliteDataService};
//!
//! let service = Arc::new(SqliteDataService::connect("sqlite://crm.db?mode=rwc", 5).await?);
//! let store = Arc::new(SnapshotStore::new());
//! store.reload_all(service.as_ref()).await;
//! spawn_change_listener(service.clone(), store.clone());
//! ```

pub mod change_feed;
pub mod commands;
pub mod error;
pub mod listener;
pub mod prefs;
pub mod service;
pub mod store;

// Re-export main types
pub use change_feed::{ChangeAction, ChangeEvent, ChangeFeed};
pub use commands::{CommandError, CommandResult, Commands, CsvExport, EmailDefaults, Operation};
pub use error::{Result, SyncError};
pub use listener::spawn_change_listener;
pub use prefs::{JsonFilePreferences, MemoryPreferences, PreferenceStore};
pub use service::{
    memory::MemoryDataService, sqlite::SqliteDataService, DataService, FetchOutcome,
};
pub use store::{ReloadReport, ReloadState, SnapshotStore};
