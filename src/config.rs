// src/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Portal behavior settings
    #[serde(default)]
    pub portal: PortalConfig,

    /// AI collaborator settings
    #[serde(default)]
    pub assistant: AssistantConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.portal.alert_timeout_secs == 0 {
            return Err(AppError::validation("portal.alert_timeout_secs must be > 0"));
        }
        if self.portal.institution_code.trim().is_empty() {
            return Err(AppError::validation("portal.institution_code is empty"));
        }
        if self.assistant.api_url.trim().is_empty() {
            return Err(AppError::validation("assistant.api_url is empty"));
        }
        if self.assistant.model.trim().is_empty() {
            return Err(AppError::validation("assistant.model is empty"));
        }
        if self.assistant.timeout_secs == 0 {
            return Err(AppError::validation("assistant.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

/// Portal behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Institution code shown on dispatched content
    #[serde(default = "defaults::institution_code")]
    pub institution_code: String,

    /// Seconds before a transient alert auto-dismisses
    #[serde(default = "defaults::alert_timeout")]
    pub alert_timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            institution_code: defaults::institution_code(),
            alert_timeout_secs: defaults::alert_timeout(),
        }
    }
}

/// AI collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Base URL of the generateContent endpoint
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Model identifier
    #[serde(default = "defaults::model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "defaults::api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::assistant_timeout")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            model: defaults::model(),
            api_key_env: defaults::api_key_env(),
            timeout_secs: defaults::assistant_timeout(),
        }
    }
}

mod defaults {
    // Portal defaults
    pub fn institution_code() -> String {
        "VITB".into()
    }
    pub fn alert_timeout() -> u64 {
        10
    }

    // Assistant defaults
    pub fn api_url() -> String {
        "https://generativelanguage.googleapis.com/v1beta/models".into()
    }
    pub fn model() -> String {
        "gemini-3-flash-preview".into()
    }
    pub fn api_key_env() -> String {
        "GEMINI_API_KEY".into()
    }
    pub fn assistant_timeout() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_alert_timeout() {
        let mut config = Config::default();
        config.portal.alert_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_model() {
        let mut config = Config::default();
        config.assistant.model = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[portal]\nalert_timeout_secs = 5\n").unwrap();
        assert_eq!(config.portal.alert_timeout_secs, 5);
        assert_eq!(config.portal.institution_code, "VITB");
        assert_eq!(config.assistant.model, "gemini-3-flash-preview");
    }
}
