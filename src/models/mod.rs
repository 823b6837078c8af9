// src/models/mod.rs

//! Domain models for the portal core.
//!
//! All persisted entities serialize with camelCase field names so the slot
//! payloads stay byte-compatible with the original browser storage layout.
//! Collections are immutable-by-replacement: a mutation produces a new
//! collection with the changed element, never an in-place edit.

mod announcement;
mod event;
mod material;
mod notification;
mod seed;
mod task;
mod user;

// Re-export all public types
pub use announcement::{Announcement, AnnouncementDraft, Priority};
pub use event::{CampusEvent, EventDraft};
pub use material::{Material, MaterialDraft, MaterialKind};
pub use notification::{Notification, NotificationKind};
pub use seed::{
    mock_faculty, mock_student, seed_announcements, seed_events, seed_materials,
    seed_notifications, seed_tasks,
};
pub use task::{Task, TaskCategory, TaskDraft, TaskStatus};
pub use user::{Role, User};

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Process-wide counter appended to generated ids.
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a collection-unique id: `{prefix}-{unix_millis}-{counter}`.
///
/// The millisecond timestamp alone would collide under rapid creation, so a
/// monotonic counter is appended.
pub fn next_id(prefix: &str) -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_unique() {
        let ids: Vec<String> = (0..100).map(|_| next_id("t")).collect();
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_next_id_prefix() {
        assert!(next_id("ann").starts_with("ann-"));
    }
}
