// File: crm-sync/src/listener.rs
// Purpose: Reload the snapshot whenever the data service reports a change

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::service::DataService;
use crate::store::SnapshotStore;

/// Spawn a task that reloads every collection on each change notification,
/// whichever collection it names. Ends when the service's feed closes.
pub fn spawn_change_listener(
    service: Arc<dyn DataService>,
    store: Arc<SnapshotStore>,
) -> JoinHandle<()> {
    let mut rx = service.subscribe();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::debug!(
                        collection = %event.collection,
                        action = %event.action,
                        "change received, reloading"
                    );
                    store.reload_all(service.as_ref()).await;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "change listener lagged, reloading");
                    store.reload_all(service.as_ref()).await;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("change feed closed, listener stopping");
                    break;
                }
            }
        }
    })
}
