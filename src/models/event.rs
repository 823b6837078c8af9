//! Campus event data structure.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A campus event users can register for. `registered` is the only field
/// any user mutates, and it toggles freely in both directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampusEvent {
    pub id: String,

    pub title: String,

    pub organizer: String,

    /// Event date in YYYY-MM-DD form
    pub date: String,

    /// Display time string (e.g. "4:00 PM")
    pub time: String,

    pub location: String,

    pub registered: bool,

    pub description: String,

    /// Cover image URL
    pub image: String,
}

/// Caller-supplied fields for a manually added calendar entry.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub organizer: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
    pub image: String,
}

impl EventDraft {
    /// Check required fields at the boundary.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("event title is required"));
        }
        if self.date.trim().is_empty() {
            return Err(AppError::validation("event date is required"));
        }
        Ok(())
    }

    /// Materialize the draft, unregistered.
    pub fn into_event(self) -> CampusEvent {
        CampusEvent {
            id: super::next_id("e"),
            title: self.title,
            organizer: self.organizer,
            date: self.date,
            time: self.time,
            location: self.location,
            registered: false,
            description: self.description,
            image: self.image,
        }
    }
}
