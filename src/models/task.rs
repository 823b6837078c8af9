//! Task data structure.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Completion state of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    /// Flip between Pending and Completed.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

/// Category of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskCategory {
    Assignment,
    Exam,
    Submission,
}

/// A deadline-bearing task, created directly or cascaded from an announcement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    /// Calendar date in YYYY-MM-DD form
    pub due_date: String,

    pub status: TaskStatus,

    pub category: TaskCategory,
}

/// Caller-supplied fields for a new task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub due_date: String,
    pub status: TaskStatus,
    pub category: TaskCategory,
}

impl TaskDraft {
    /// Check required fields at the boundary.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("task title is required"));
        }
        if self.due_date.trim().is_empty() {
            return Err(AppError::validation("task due date is required"));
        }
        Ok(())
    }

    /// Materialize the draft with a freshly generated id.
    pub fn into_task(self) -> Task {
        Task {
            id: super::next_id("t"),
            title: self.title,
            due_date: self.due_date,
            status: self.status,
            category: self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_toggle_roundtrip() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Pending.toggled().toggled(), TaskStatus::Pending);
    }

    #[test]
    fn test_draft_rejects_empty_title() {
        let draft = TaskDraft {
            title: "  ".into(),
            due_date: "2024-09-25".into(),
            status: TaskStatus::Pending,
            category: TaskCategory::Assignment,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let task = Task {
            id: "t-1".into(),
            title: "ML Assignment 2".into(),
            due_date: "2024-09-25".into(),
            status: TaskStatus::Pending,
            category: TaskCategory::Assignment,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"dueDate\":\"2024-09-25\""));
        assert!(json.contains("\"status\":\"Pending\""));
    }
}
