//! Slot-based persistence and the cross-tab change feed.
//!
//! Each entity collection lives in one named slot, serialized as a JSON
//! array. The slot write is also the broadcast mechanism: every successful
//! `persist` publishes a [`StorageEvent`] that other sessions observe, while
//! the writing session skips its own events by origin id. This models the
//! browser guarantee that storage events fire only in *other* tabs.
//!
//! ## Slot Layout
//!
//! ```text
//! {root}/
//! ├── edu_tasks.json
//! ├── edu_events.json
//! ├── edu_announcements.json
//! ├── edu_materials.json
//! └── edu_notifications.json
//! ```

pub mod local;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::error::{AppError, Result};

// Re-export for convenience
pub use local::LocalSlotStorage;

/// The five persisted entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Tasks,
    Events,
    Announcements,
    Materials,
    Notifications,
}

impl Slot {
    /// All slots, for iteration.
    pub const ALL: [Slot; 5] = [
        Slot::Tasks,
        Slot::Events,
        Slot::Announcements,
        Slot::Materials,
        Slot::Notifications,
    ];

    /// Stable storage key for this slot.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Tasks => "edu_tasks",
            Slot::Events => "edu_events",
            Slot::Announcements => "edu_announcements",
            Slot::Materials => "edu_materials",
            Slot::Notifications => "edu_notifications",
        }
    }

    /// Resolve a storage key back to a slot. Unknown keys are ignored by
    /// listeners.
    pub fn from_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.key() == key)
    }
}

/// A slot mutation observed by other sessions.
#[derive(Debug, Clone)]
pub struct StorageEvent {
    /// Storage key of the mutated slot
    pub key: String,
    /// Serialized collection after the write
    pub new_value: String,
    /// Session id of the writer; receivers skip their own writes
    pub origin: u64,
}

/// Durable backend for slot payloads.
#[async_trait]
pub trait SlotStorage: Send + Sync {
    /// Read a slot payload, `None` if the slot was never written.
    async fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Write a slot payload, replacing any previous value.
    async fn write_slot(&self, key: &str, payload: &str) -> Result<()>;
}

/// Shared persistence adapter plus change feed.
///
/// One hub stands in for one browser profile's local storage; every
/// simulated tab holds an `Arc` to the same hub.
pub struct StorageHub {
    storage: Arc<dyn SlotStorage>,
    tx: broadcast::Sender<StorageEvent>,
    next_origin: AtomicU64,
}

impl StorageHub {
    /// Create a hub over the given backend.
    pub fn new(storage: Arc<dyn SlotStorage>) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            storage,
            tx,
            next_origin: AtomicU64::new(1),
        }
    }

    /// Allocate a unique origin id for a new session.
    pub fn register_origin(&self) -> u64 {
        self.next_origin.fetch_add(1, Ordering::Relaxed)
    }

    /// Subscribe to slot mutations from all sessions.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.tx.subscribe()
    }

    /// Load a collection from its slot, falling back to `seed` when the slot
    /// is absent or unreadable. Never fails: a parse failure is treated
    /// identically to absence.
    pub async fn load<T: DeserializeOwned>(&self, slot: Slot, seed: Vec<T>) -> Vec<T> {
        match self.storage.read_slot(slot.key()).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(collection) => collection,
                Err(e) => {
                    log::warn!("Slot {} is malformed, using seed data: {}", slot.key(), e);
                    seed
                }
            },
            Ok(None) => seed,
            Err(e) => {
                log::warn!("Slot {} unreadable, using seed data: {}", slot.key(), e);
                seed
            }
        }
    }

    /// Serialize and write a collection to its slot, then broadcast the
    /// change. The write happens before the broadcast so observers always
    /// find the durable mirror at least as new as the event.
    pub async fn persist<T: Serialize>(
        &self,
        origin: u64,
        slot: Slot,
        collection: &[T],
    ) -> Result<()> {
        let payload = serde_json::to_string(collection)?;
        self.storage
            .write_slot(slot.key(), &payload)
            .await
            .map_err(|e| AppError::persistence(slot.key(), e))?;

        // No receivers is fine: single-tab operation.
        let _ = self.tx.send(StorageEvent {
            key: slot.key().to_string(),
            new_value: payload,
            origin,
        });
        Ok(())
    }

    /// Publish an event without touching storage, for exercising listener
    /// recovery paths that `persist` cannot produce (e.g. torn payloads).
    #[cfg(test)]
    pub(crate) fn publish_raw(&self, event: StorageEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskCategory, TaskStatus, seed_tasks};
    use tempfile::TempDir;

    fn hub(tmp: &TempDir) -> StorageHub {
        StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path())))
    }

    #[test]
    fn test_slot_key_roundtrip() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(Slot::from_key("edu_unknown"), None);
    }

    #[tokio::test]
    async fn test_load_absent_slot_uses_seed() {
        let tmp = TempDir::new().unwrap();
        let hub = hub(&tmp);

        let tasks: Vec<Task> = hub.load(Slot::Tasks, seed_tasks()).await;
        assert_eq!(tasks, seed_tasks());
    }

    #[tokio::test]
    async fn test_load_malformed_slot_uses_seed() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalSlotStorage::new(tmp.path());
        storage
            .write_slot(Slot::Tasks.key(), "{not json]")
            .await
            .unwrap();

        let hub = StorageHub::new(Arc::new(storage));
        let tasks: Vec<Task> = hub.load(Slot::Tasks, seed_tasks()).await;
        assert_eq!(tasks, seed_tasks());
    }

    #[tokio::test]
    async fn test_persist_load_roundtrip_ignores_seed() {
        let tmp = TempDir::new().unwrap();
        let hub = hub(&tmp);

        let written = vec![Task {
            id: "t-9".into(),
            title: "Compiler Quiz".into(),
            due_date: "2024-10-01".into(),
            status: TaskStatus::Pending,
            category: TaskCategory::Exam,
        }];
        hub.persist(1, Slot::Tasks, &written).await.unwrap();

        // Fresh hub over the same directory, as a new tab would open.
        let reopened = StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path())));
        let loaded: Vec<Task> = reopened.load(Slot::Tasks, seed_tasks()).await;
        assert_eq!(loaded, written);
    }

    #[tokio::test]
    async fn test_persist_broadcasts_with_origin() {
        let tmp = TempDir::new().unwrap();
        let hub = hub(&tmp);
        let mut rx = hub.subscribe();

        hub.persist(7, Slot::Announcements, &Vec::<Task>::new())
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.key, "edu_announcements");
        assert_eq!(event.origin, 7);
        assert_eq!(event.new_value, "[]");
    }

    #[test]
    fn test_origins_are_unique() {
        let tmp = TempDir::new().unwrap();
        let hub = hub(&tmp);
        assert_ne!(hub.register_origin(), hub.register_origin());
    }
}
