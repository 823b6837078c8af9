//! Notification data structure.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Source category of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Announcement,
    Deadline,
    Material,
    Event,
}

/// A persisted activity-feed entry.
///
/// Always synthesized as a side effect of another entity's creation, never
/// created directly by a user action. `is_read` only moves false to true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,

    pub title: String,

    pub message: String,

    /// Display time string, captured at synthesis
    pub time: String,

    #[serde(rename = "type")]
    pub kind: NotificationKind,

    pub is_read: bool,
}

impl Notification {
    /// Synthesize a new unread notification stamped with the current time.
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: super::next_id("n"),
            title: title.into(),
            message: message.into(),
            time: Local::now().format("%H:%M").to_string(),
            kind,
            is_read: false,
        }
    }
}
