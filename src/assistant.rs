// src/assistant.rs

//! AI collaborator: deadline extraction, digest, and chat.
//!
//! The collaborator is an opaque, latency-bearing, fallible service. The
//! core never assumes availability: extraction failures are swallowed by the
//! caller, and digest/chat failures surface as plain-language fallback
//! strings rather than errors.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::AssistantConfig;
use crate::error::{AppError, Result};
use crate::models::{Announcement, Task, TaskCategory};

/// Fallback shown when digest generation fails.
pub const DIGEST_FALLBACK: &str =
    "Error generating digest. Please check your dashboard manually.";

/// Fallback shown when the chat backend is unreachable.
pub const CHAT_FALLBACK: &str =
    "I'm having trouble connecting right now. Please try again later.";

/// A structured deadline detected in free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeadlineExtraction {
    pub title: String,
    /// Calendar date in YYYY-MM-DD form
    pub date: String,
    /// Reported kind: Assignment, Exam, Registration, or Event
    #[serde(rename = "type")]
    pub kind: String,
}

impl DeadlineExtraction {
    /// The extracted date, when it is usable.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Map the reported kind onto a task category, defaulting to Assignment
    /// for anything unrecognized.
    pub fn category(&self) -> TaskCategory {
        match self.kind.trim() {
            "Exam" => TaskCategory::Exam,
            "Submission" => TaskCategory::Submission,
            _ => TaskCategory::Assignment,
        }
    }
}

/// One prior exchange in a chat conversation.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// "user" or "model"
    pub role: String,
    pub text: String,
}

/// Text-generation collaborator contract.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Extract a structured deadline from announcement text. `Ok(None)`
    /// means no usable date was detected.
    async fn extract_deadline(&self, text: &str) -> Result<Option<DeadlineExtraction>>;

    /// Summarize pending state into a student digest. Never fails; returns
    /// [`DIGEST_FALLBACK`] on any error.
    async fn generate_digest(&self, announcements: &[Announcement], tasks: &[Task]) -> String;

    /// Answer a user message given prior history. Never fails; returns
    /// [`CHAT_FALLBACK`] on any error.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> String;
}

const CHAT_SYSTEM_PROMPT: &str = "You are EduPulse AI, the official virtual assistant for the \
EduPulse Institutional Platform at VITB University. Your primary goal is to help users navigate \
and understand the platform: Overview (dashboard and AI briefing), Announcements (official \
faculty notices with deadline sync), Calendar, Materials, Timetable, Academics, Events, Library, \
and Objectives (task management). Keep responses concise, helpful, and professional. If you do \
not know something about the university, offer to help the user find the right tab.";

/// Gemini generateContent client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            AppError::config(format!("{} must be set", config.api_key_env))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Send one generateContent request and return the first candidate text.
    async fn generate(&self, body: serde_json::Value) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        );

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(AppError::external(format!(
                "Gemini API error: {} - {}",
                status, text
            )));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| AppError::external("Gemini response missing candidates"))
    }
}

#[async_trait]
impl Assistant for GeminiClient {
    async fn extract_deadline(&self, text: &str) -> Result<Option<DeadlineExtraction>> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!(
                    "Extract deadlines or event dates from the following announcement. \
                     Return a JSON object with 'title', 'date', and 'type'. \
                     Announcement: \"{text}\""
                ) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "date": { "type": "STRING", "description": "YYYY-MM-DD format" },
                        "type": { "type": "STRING",
                                  "description": "Assignment, Exam, Registration, or Event" }
                    },
                    "required": ["title", "date", "type"]
                }
            }
        });

        let content = self.generate(body).await?;
        let extraction: DeadlineExtraction = serde_json::from_str(&content)
            .map_err(|e| AppError::external(format!("unparseable extraction: {e}")))?;

        if extraction.parsed_date().is_none() {
            log::debug!("Extraction returned unusable date: {:?}", extraction.date);
            return Ok(None);
        }
        Ok(Some(extraction))
    }

    async fn generate_digest(&self, announcements: &[Announcement], tasks: &[Task]) -> String {
        let headlines: Vec<serde_json::Value> = announcements
            .iter()
            .map(|a| json!({ "title": a.title, "priority": a.priority }))
            .collect();
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": "You are an intelligent campus assistant for VITB university." }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": format!(
                    "Create a concise and encouraging student digest summary based on these \
                     recent institutional updates and pending tasks. Highlight urgent items \
                     first. Use bullet points. Announcements: {} Pending Tasks: {}",
                    serde_json::to_string(&headlines).unwrap_or_default(),
                    serde_json::to_string(tasks).unwrap_or_default()
                ) }]
            }]
        });

        match self.generate(body).await {
            Ok(digest) => digest,
            Err(e) => {
                log::warn!("Digest generation failed: {}", e);
                DIGEST_FALLBACK.to_string()
            }
        }
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> String {
        let mut contents: Vec<serde_json::Value> = history
            .iter()
            .map(|turn| json!({ "role": turn.role, "parts": [{ "text": turn.text }] }))
            .collect();
        contents.push(json!({ "role": "user", "parts": [{ "text": message }] }));

        let body = json!({
            "systemInstruction": { "parts": [{ "text": CHAT_SYSTEM_PROMPT }] },
            "contents": contents
        });

        match self.generate(body).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Chat request failed: {}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

/// Assistant used when no API key is configured: detects nothing and always
/// answers with the fallback strings.
pub struct NullAssistant;

#[async_trait]
impl Assistant for NullAssistant {
    async fn extract_deadline(&self, _text: &str) -> Result<Option<DeadlineExtraction>> {
        Ok(None)
    }

    async fn generate_digest(&self, _announcements: &[Announcement], _tasks: &[Task]) -> String {
        DIGEST_FALLBACK.to_string()
    }

    async fn chat(&self, _history: &[ChatTurn], _message: &str) -> String {
        CHAT_FALLBACK.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

/// Scripted assistant for tests: serves queued extraction outcomes in order,
/// then `Ok(None)`.
#[cfg(test)]
pub struct ScriptedAssistant {
    outcomes: std::sync::Mutex<std::collections::VecDeque<Result<Option<DeadlineExtraction>>>>,
}

#[cfg(test)]
impl ScriptedAssistant {
    pub fn new(outcomes: Vec<Result<Option<DeadlineExtraction>>>) -> Self {
        Self {
            outcomes: std::sync::Mutex::new(outcomes.into()),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
#[async_trait]
impl Assistant for ScriptedAssistant {
    async fn extract_deadline(&self, _text: &str) -> Result<Option<DeadlineExtraction>> {
        self.outcomes
            .lock()
            .expect("scripted outcomes poisoned")
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn generate_digest(&self, announcements: &[Announcement], tasks: &[Task]) -> String {
        format!(
            "Digest of {} announcements and {} tasks",
            announcements.len(),
            tasks.len()
        )
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> String {
        format!("({} prior turns) You said: {}", history.len(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_category_mapping() {
        let mut ex = DeadlineExtraction {
            title: "Exam Notice".into(),
            date: "2024-10-15".into(),
            kind: "Exam".into(),
        };
        assert_eq!(ex.category(), TaskCategory::Exam);

        ex.kind = "Registration".into();
        assert_eq!(ex.category(), TaskCategory::Assignment);

        ex.kind = "Submission".into();
        assert_eq!(ex.category(), TaskCategory::Submission);
    }

    #[test]
    fn test_unusable_date_detected() {
        let ex = DeadlineExtraction {
            title: "t".into(),
            date: "next Friday".into(),
            kind: "Event".into(),
        };
        assert!(ex.parsed_date().is_none());
    }

    #[test]
    fn test_extraction_parses_type_field() {
        let ex: DeadlineExtraction =
            serde_json::from_str(r#"{"title":"Exam Notice","date":"2024-10-15","type":"Exam"}"#)
                .unwrap();
        assert_eq!(ex.kind, "Exam");
        assert!(ex.parsed_date().is_some());
    }

    #[tokio::test]
    async fn test_null_assistant_falls_back() {
        let assistant = NullAssistant;
        assert_eq!(assistant.extract_deadline("anything").await.unwrap(), None);
        assert_eq!(assistant.generate_digest(&[], &[]).await, DIGEST_FALLBACK);
        assert_eq!(assistant.chat(&[], "hi").await, CHAT_FALLBACK);
    }

    #[tokio::test]
    async fn test_scripted_assistant_serves_in_order() {
        let assistant = ScriptedAssistant::new(vec![
            Ok(Some(DeadlineExtraction {
                title: "Exam Notice".into(),
                date: "2024-10-15".into(),
                kind: "Exam".into(),
            })),
            Err(AppError::external("down")),
        ]);
        assert!(assistant.extract_deadline("a").await.unwrap().is_some());
        assert!(assistant.extract_deadline("b").await.is_err());
        assert_eq!(assistant.extract_deadline("c").await.unwrap(), None);
    }
}
