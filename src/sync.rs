// src/sync.rs

//! Cross-tab synchronization listener.
//!
//! Every session subscribes to the hub's change feed for the lifetime of
//! the session. Events from the session's own writes are skipped, matching
//! the browser rule that storage events fire only in other tabs.
//!
//! Reconciliation is one-directional, last writer wins for the whole
//! collection. For announcements, "strictly more elements than we have" is
//! the heuristic for "something new arrived"; it does not handle deletions
//! or same-length edits, a known limitation carried over from the source
//! behavior.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::models::{Announcement, Material, Notification, NotificationKind, Role, Task};
use crate::session::Session;
use crate::store::{Slot, StorageEvent};

/// Spawn the sync listener task for a session. The handle is owned by the
/// session and aborted on close.
///
/// The subscription is taken before the task is spawned, so a write landing
/// between attach and the task's first poll is still delivered.
pub fn spawn(session: Arc<Session>) -> JoinHandle<()> {
    let rx = session.hub().subscribe();
    tokio::spawn(run(session, rx))
}

async fn run(session: Arc<Session>, mut rx: broadcast::Receiver<StorageEvent>) {
    log::debug!("Sync listener attached for session {}", session.id());

    loop {
        match rx.recv().await {
            Ok(event) => handle_event(&session, event).await,
            Err(RecvError::Lagged(missed)) => {
                // Dropped events are acceptable under last-write-wins; the
                // next event carries the full collection anyway.
                log::warn!(
                    "Session {} sync listener lagged, skipped {} events",
                    session.id(),
                    missed
                );
            }
            Err(RecvError::Closed) => break,
        }
    }
    log::debug!("Sync listener detached for session {}", session.id());
}

async fn handle_event(session: &Session, event: StorageEvent) {
    if event.origin == session.id() {
        return;
    }
    let Some(slot) = Slot::from_key(&event.key) else {
        return;
    };

    match slot {
        Slot::Announcements => apply_announcements(session, &event.new_value).await,
        Slot::Tasks => {
            if let Some(tasks) = parse_collection::<Task>(slot, &event.new_value) {
                session.state_handle().write().await.tasks = tasks;
            }
        }
        Slot::Materials => {
            if let Some(materials) = parse_collection::<Material>(slot, &event.new_value) {
                session.state_handle().write().await.materials = materials;
            }
        }
        Slot::Notifications => {
            if let Some(notifications) = parse_collection::<Notification>(slot, &event.new_value)
            {
                session.state_handle().write().await.notifications = notifications;
            }
        }
        // The source registers no cross-tab handler for events.
        Slot::Events => {}
    }
}

/// Adopt an incoming announcements snapshot when it is strictly larger than
/// the local one, treating its first element as the latest arrival. Student
/// sessions additionally synthesize a notification and raise the transient
/// alert.
async fn apply_announcements(session: &Session, payload: &str) {
    let Some(incoming) = parse_collection::<Announcement>(Slot::Announcements, payload) else {
        return;
    };

    let latest = {
        let mut state = session.state_handle().write().await;
        if incoming.len() <= state.announcements.len() {
            return;
        }
        let latest = incoming.first().cloned();
        state.announcements = incoming;
        latest
    };

    let Some(latest) = latest else { return };
    log::info!(
        "Session {} adopted external announcement: {}",
        session.id(),
        latest.title
    );

    if session.role() == Role::Student {
        let notification = Notification::new(
            NotificationKind::Announcement,
            "New Faculty Dispatch",
            format!("{} posted: {}", latest.posted_by, latest.title),
        );
        let snapshot = {
            let mut state = session.state_handle().write().await;
            state.notifications.insert(0, notification.clone());
            state.notifications.clone()
        };
        // Mirrored under this session's own origin, so the listener skips
        // the resulting event instead of reacting to its own write.
        if let Err(e) = session
            .hub()
            .persist(session.id(), Slot::Notifications, &snapshot)
            .await
        {
            log::error!("Slot write failed, in-memory state unaffected: {}", e);
        }
        session.raise_alert(notification).await;
    }
}

/// Parse a slot payload, skipping the update on malformed JSON.
fn parse_collection<T: DeserializeOwned>(slot: Slot, payload: &str) -> Option<Vec<T>> {
    match serde_json::from_str(payload) {
        Ok(collection) => Some(collection),
        Err(e) => {
            log::warn!(
                "Skipping cross-tab update for {}: malformed payload: {}",
                slot.key(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::ScriptedAssistant;
    use crate::config::Config;
    use crate::models::{
        AnnouncementDraft, Priority, mock_faculty, mock_student, seed_announcements, seed_tasks,
    };
    use crate::store::{LocalSlotStorage, StorageHub};
    use std::time::Duration;
    use tempfile::TempDir;

    async fn open_listening(user: crate::models::User, hub: &Arc<StorageHub>) -> Arc<Session> {
        let session = Arc::new(
            Session::open(
                user,
                Arc::clone(hub),
                Arc::new(ScriptedAssistant::empty()),
                &Config::default(),
            )
            .await,
        );
        Arc::clone(&session).attach_listener();
        session
    }

    fn grown_announcements() -> Vec<Announcement> {
        let mut all = seed_announcements();
        all.insert(
            0,
            AnnouncementDraft {
                title: "Exam Notice".into(),
                content: "Mid-terms begin soon.".into(),
                priority: Priority::Urgent,
                posted_by: "Registrar Office".into(),
                deadline: None,
            }
            .into_announcement(),
        );
        all
    }

    async fn eventually(check: impl AsyncFn() -> bool) -> bool {
        for _ in 0..200 {
            if check().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_student_adopts_and_raises_alert() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Announcements, &grown_announcements())
            .await
            .unwrap();

        assert!(
            eventually(async || session.state().await.announcements.len() == 5).await,
            "announcements not adopted"
        );
        assert!(
            eventually(async || session.state().await.alert.is_some()).await,
            "alert not raised"
        );

        let state = session.state().await;
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].title, "New Faculty Dispatch");
        assert!(
            state.notifications[0]
                .message
                .contains("Registrar Office posted: Exam Notice")
        );
        let alert = state.alert.as_ref().expect("alert not raised");
        assert_eq!(alert.notification.id, state.notifications[0].id);
    }

    #[tokio::test]
    async fn test_faculty_adopts_without_alert() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_faculty(), &hub).await;

        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Announcements, &grown_announcements())
            .await
            .unwrap();

        assert!(eventually(async || session.state().await.announcements.len() == 5).await);
        let state = session.state().await;
        assert!(state.notifications.is_empty());
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_same_length_snapshot_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        let mut edited = seed_announcements();
        edited[0].title = "Edited Title".into();
        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Announcements, &edited)
            .await
            .unwrap();

        // Give the listener a chance to (wrongly) apply it.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = session.state().await;
        assert_ne!(state.announcements[0].title, "Edited Title");
        assert!(state.alert.is_none());
    }

    #[tokio::test]
    async fn test_own_writes_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        hub.persist(session.id(), Slot::Announcements, &grown_announcements())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        // The write is durable but the local collection was not merged back.
        assert_eq!(session.state().await.announcements.len(), 4);
    }

    #[tokio::test]
    async fn test_tasks_snapshot_adopted_unconditionally() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        // Shrinking is fine for tasks: adoption has no size heuristic.
        let one_task = vec![seed_tasks().remove(0)];
        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Tasks, &one_task)
            .await
            .unwrap();

        assert!(eventually(async || session.state().await.tasks.len() == 1).await);
        assert!(session.state().await.alert.is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_skips_update() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;
        let state_before = session.state().await.announcements.clone();

        let external_origin = hub.register_origin();
        hub.publish_raw(StorageEvent {
            key: Slot::Announcements.key().to_string(),
            new_value: "{broken".into(),
            origin: external_origin,
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(session.state().await.announcements, state_before);

        // A well-formed follow-up still lands, proving the listener survived.
        hub.persist(external_origin, Slot::Announcements, &grown_announcements())
            .await
            .unwrap();
        assert!(eventually(async || session.state().await.announcements.len() == 5).await);
    }

    #[tokio::test]
    async fn test_write_between_attach_and_first_poll_is_observed() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        // Persist before the listener task has had any chance to run: the
        // subscription must already exist when attach returns.
        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Announcements, &grown_announcements())
            .await
            .unwrap();

        assert!(
            eventually(async || session.state().await.announcements.len() == 5).await,
            "write landing right after attach was lost"
        );
    }

    #[tokio::test]
    async fn test_dispatch_notification_is_mirrored_to_slot() {
        let tmp = TempDir::new().unwrap();
        let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path()))));
        let session = open_listening(mock_student(), &hub).await;

        let external_origin = hub.register_origin();
        hub.persist(external_origin, Slot::Announcements, &grown_announcements())
            .await
            .unwrap();
        assert!(eventually(async || session.state().await.notifications.len() == 1).await);

        // The slot mirror holds the synthesized notification too.
        let reopened = StorageHub::new(Arc::new(LocalSlotStorage::new(tmp.path())));
        assert!(
            eventually(async || {
                let stored: Vec<Notification> = reopened
                    .load(Slot::Notifications, Vec::new())
                    .await;
                stored.len() == 1 && stored[0].title == "New Faculty Dispatch"
            })
            .await,
            "notifications slot not mirrored"
        );
    }
}
