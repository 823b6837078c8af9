//! Announcement data structure.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Priority band of an announcement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Urgent,
    Academic,
    Event,
    General,
}

/// An institutional notice posted by faculty.
///
/// Immutable after creation except for `is_read`. Creation always cascades
/// into one notification, and optionally into one task via deadline
/// extraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,

    pub title: String,

    pub content: String,

    pub priority: Priority,

    /// Display name of the posting office or person
    pub posted_by: String,

    /// Posting date in YYYY-MM-DD form
    pub date: String,

    /// Explicit deadline, when the notice carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,

    pub is_read: bool,
}

/// Caller-supplied fields for a new announcement.
#[derive(Debug, Clone)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub posted_by: String,
    pub deadline: Option<String>,
}

impl AnnouncementDraft {
    /// Check required fields at the boundary.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("announcement title is required"));
        }
        if self.content.trim().is_empty() {
            return Err(AppError::validation("announcement content is required"));
        }
        if self.posted_by.trim().is_empty() {
            return Err(AppError::validation("announcement postedBy is required"));
        }
        Ok(())
    }

    /// Materialize the draft, unread, dated today.
    pub fn into_announcement(self) -> Announcement {
        Announcement {
            id: super::next_id("ann"),
            title: self.title,
            content: self.content,
            priority: self.priority,
            posted_by: self.posted_by,
            date: Local::now().format("%Y-%m-%d").to_string(),
            deadline: self.deadline,
            is_read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_rejects_empty_content() {
        let draft = AnnouncementDraft {
            title: "Exam Notice".into(),
            content: "".into(),
            priority: Priority::Urgent,
            posted_by: "Registrar Office".into(),
            deadline: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_into_announcement_starts_unread() {
        let ann = AnnouncementDraft {
            title: "Exam Notice".into(),
            content: "Mid-terms start October 15th.".into(),
            priority: Priority::Urgent,
            posted_by: "Registrar Office".into(),
            deadline: Some("2024-10-15".into()),
        }
        .into_announcement();
        assert!(!ann.is_read);
        assert!(ann.id.starts_with("ann-"));
    }

    #[test]
    fn test_deadline_omitted_when_absent() {
        let ann = AnnouncementDraft {
            title: "Library Notice".into(),
            content: "Closed Sunday.".into(),
            priority: Priority::General,
            posted_by: "Librarian".into(),
            deadline: None,
        }
        .into_announcement();
        let json = serde_json::to_string(&ann).unwrap();
        assert!(!json.contains("deadline"));
        assert!(json.contains("\"postedBy\":\"Librarian\""));
    }
}
