// src/error.rs

//! Unified error handling for the portal core.

use thiserror::Error;

/// Result type alias for portal operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draft validation error (blocks the initiating write)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Role check failed for a role-scoped dispatcher
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Slot write failed (in-memory state is already updated)
    #[error("Persistence error for slot '{slot}': {message}")]
    Persistence { slot: String, message: String },

    /// AI collaborator unreachable or returned unusable data
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Create a persistence error for a slot.
    pub fn persistence(slot: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Persistence {
            slot: slot.into(),
            message: message.to_string(),
        }
    }

    /// Create an external service error.
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalService(message.into())
    }
}
