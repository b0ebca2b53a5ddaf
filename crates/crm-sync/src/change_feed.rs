// File: crm-sync/src/change_feed.rs
// Purpose: Broadcast of write notifications from the data service

use chrono::{DateTime, Utc};
use crm_core::{Collection, RecordId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Buffered notifications per subscriber before it starts lagging
pub const FEED_CAPACITY: usize = 1000;

/// Action performed on a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "create"),
            ChangeAction::Update => write!(f, "update"),
            ChangeAction::Delete => write!(f, "delete"),
        }
    }
}

/// "Something changed in this collection"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub action: ChangeAction,
    pub record_id: RecordId,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(collection: Collection, action: ChangeAction, record_id: RecordId) -> Self {
        Self {
            collection,
            action,
            record_id,
            at: Utc::now(),
        }
    }
}

/// Fan-out of change events to every subscriber
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    broadcast_tx: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { broadcast_tx }
    }

    /// Notify subscribers; a feed nobody listens to drops the event
    pub fn publish(&self, event: ChangeEvent) {
        tracing::debug!(
            collection = %event.collection,
            action = %event.action,
            id = %event.record_id,
            "change published"
        );
        let _ = self.broadcast_tx.send(event);
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.broadcast_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(ChangeEvent::new(
            Collection::Contacts,
            ChangeAction::Create,
            RecordId::new("c1"),
        ));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Contacts);
        assert_eq!(event.action, ChangeAction::Create);
        assert_eq!(event.record_id.as_str(), "c1");
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let feed = ChangeFeed::new();
        feed.publish(ChangeEvent::new(
            Collection::Properties,
            ChangeAction::Delete,
            RecordId::new("p1"),
        ));
    }

    #[test]
    fn test_event_serializes_with_table_name() {
        let event = ChangeEvent::new(
            Collection::Appointments,
            ChangeAction::Update,
            RecordId::new("a1"),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["collection"], "compromissos");
        assert_eq!(json["action"], "update");
        assert_eq!(json["record_id"], "a1");
    }
}
