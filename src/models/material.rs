//! Course material data structure.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// File kind of an uploaded material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MaterialKind {
    #[serde(rename = "PDF")]
    Pdf,
    Slides,
    Notes,
}

/// A study resource uploaded by faculty. No update or delete path exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,

    pub subject: String,

    pub title: String,

    #[serde(rename = "type")]
    pub kind: MaterialKind,

    pub uploaded_by: String,

    /// Upload date in YYYY-MM-DD form
    pub date: String,

    /// Link target; may be a large embedded data URL for uploaded files
    pub url: String,
}

/// Caller-supplied fields for a new material.
#[derive(Debug, Clone)]
pub struct MaterialDraft {
    pub subject: String,
    pub title: String,
    pub kind: MaterialKind,
    pub uploaded_by: String,
    pub url: String,
}

impl MaterialDraft {
    /// Check required fields at the boundary.
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(AppError::validation("material subject is required"));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::validation("material title is required"));
        }
        if self.uploaded_by.trim().is_empty() {
            return Err(AppError::validation("material uploadedBy is required"));
        }
        Ok(())
    }

    /// Materialize the draft, dated today.
    pub fn into_material(self) -> Material {
        Material {
            id: super::next_id("m"),
            subject: self.subject,
            title: self.title,
            kind: self.kind,
            uploaded_by: self.uploaded_by,
            date: Local::now().format("%Y-%m-%d").to_string(),
            url: self.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_uppercase_pdf() {
        let json = serde_json::to_string(&MaterialKind::Pdf).unwrap();
        assert_eq!(json, "\"PDF\"");
    }

    #[test]
    fn test_type_field_name_on_wire() {
        let material = MaterialDraft {
            subject: "Machine Learning".into(),
            title: "Lecture 1".into(),
            kind: MaterialKind::Slides,
            uploaded_by: "Dr. Ramesh Kumar".into(),
            url: "#".into(),
        }
        .into_material();
        let json = serde_json::to_string(&material).unwrap();
        assert!(json.contains("\"type\":\"Slides\""));
        assert!(json.contains("\"uploadedBy\""));
    }

    #[test]
    fn test_draft_rejects_empty_subject() {
        let draft = MaterialDraft {
            subject: "".into(),
            title: "Lecture 1".into(),
            kind: MaterialKind::Pdf,
            uploaded_by: "Dr. Ramesh Kumar".into(),
            url: "#".into(),
        };
        assert!(draft.validate().is_err());
    }
}
