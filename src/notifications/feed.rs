// Change feed
//
// Submission and support-message writes are published on a broadcast
// channel. Live notification streams subscribe and filter by visibility.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Submissions,
    SupportMessages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Insert,
    Update,
}

/// One row written to a watched table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub action: ChangeAction,
    pub record_id: Uuid,
    /// Owner of the changed row
    pub user_id: Uuid,
}

impl ChangeEvent {
    pub fn submission(action: ChangeAction, record_id: Uuid, user_id: Uuid) -> Self {
        Self {
            table: ChangeTable::Submissions,
            action,
            record_id,
            user_id,
        }
    }

    pub fn support_message(action: ChangeAction, record_id: Uuid, user_id: Uuid) -> Self {
        Self {
            table: ChangeTable::SupportMessages,
            action,
            record_id,
            user_id,
        }
    }

    /// Admins see every change, users only changes to their own rows
    pub fn is_visible_to(&self, user_id: Uuid, is_admin: bool) -> bool {
        is_admin || self.user_id == user_id
    }
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish without waiting; dropped when nobody is listening
    pub fn publish(&self, event: ChangeEvent) {
        let table = event.table;
        match self.tx.send(event) {
            Ok(receivers) => debug!(?table, receivers, "Published change event"),
            Err(_) => debug!(?table, "No subscribers for change event"),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}
