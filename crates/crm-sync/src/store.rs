// File: crm-sync/src/store.rs
// Purpose: The shared snapshot and the coarse reload that replaces it

use crm_core::{Collection, Snapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::service::{DataService, FetchOutcome};

/// Whether a reload is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
    Idle,
    Loading,
}

/// What went wrong during one reload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Collections whose fetch failed and kept their previous records
    pub failed: Vec<Collection>,
    /// Rows skipped because they could not be coerced
    pub rejected: usize,
}

impl ReloadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.rejected == 0
    }
}

/// Holds the latest snapshot. Readers get an `Arc` and never block a reload
/// for longer than the pointer swap.
pub struct SnapshotStore {
    current: RwLock<Arc<Snapshot>>,
    loading: AtomicBool,
    reload_gate: Mutex<()>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::default())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            loading: AtomicBool::new(false),
            reload_gate: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    pub fn state(&self) -> ReloadState {
        if self.loading.load(Ordering::Acquire) {
            ReloadState::Loading
        } else {
            ReloadState::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == ReloadState::Loading
    }

    /// Fetch all three collections and swap in a new snapshot.
    ///
    /// A collection whose fetch fails keeps its previous records. Reloads are
    /// serialized, so the last one to finish always reflects the latest reads.
    pub async fn reload_all(&self, service: &dyn DataService) -> ReloadReport {
        let _gate = self.reload_gate.lock().await;
        self.loading.store(true, Ordering::Release);

        let (contacts, appointments, properties) = tokio::join!(
            service.fetch_contacts(),
            service.fetch_appointments(),
            service.fetch_properties(),
        );

        let previous = self.snapshot().await;
        let mut report = ReloadReport::default();
        let next = Snapshot::new(
            keep_or_replace(Collection::Contacts, contacts, &previous.contacts, &mut report),
            keep_or_replace(
                Collection::Appointments,
                appointments,
                &previous.appointments,
                &mut report,
            ),
            keep_or_replace(
                Collection::Properties,
                properties,
                &previous.properties,
                &mut report,
            ),
        );

        tracing::info!(
            contacts = next.contacts.len(),
            appointments = next.appointments.len(),
            properties = next.properties.len(),
            failed = report.failed.len(),
            rejected = report.rejected,
            "snapshot reloaded"
        );

        *self.current.write().await = Arc::new(next);
        self.loading.store(false, Ordering::Release);
        report
    }
}

fn keep_or_replace<T: Clone>(
    collection: Collection,
    fetched: Result<FetchOutcome<T>>,
    previous: &[T],
    report: &mut ReloadReport,
) -> Vec<T> {
    match fetched {
        Ok(outcome) => {
            report.rejected += outcome.rejected.len();
            outcome.records
        }
        Err(error) => {
            tracing::error!(%collection, %error, "fetch failed, keeping previous records");
            report.failed.push(collection);
            previous.to_vec()
        }
    }
}
