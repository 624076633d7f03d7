use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Transcribing,
    Transcribed,
    TranscriptionFailed,
}

impl WebhookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookStatus::Transcribing => "transcribing",
            WebhookStatus::Transcribed => "transcribed",
            WebhookStatus::TranscriptionFailed => "transcription_failed",
        }
    }
}

impl fmt::Display for WebhookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A job lifecycle notification for an external system.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub recording_id: Option<String>,
    pub status: WebhookStatus,
    pub transcription_text: Option<String>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl WebhookEvent {
    pub fn transcribing(recording_id: Option<String>) -> Self {
        Self::new(recording_id, WebhookStatus::Transcribing, None, None)
    }

    pub fn transcribed(recording_id: Option<String>, text: String) -> Self {
        Self::new(recording_id, WebhookStatus::Transcribed, Some(text), None)
    }

    pub fn failed(recording_id: Option<String>, error: String) -> Self {
        Self::new(
            recording_id,
            WebhookStatus::TranscriptionFailed,
            None,
            Some(error),
        )
    }

    fn new(
        recording_id: Option<String>,
        status: WebhookStatus,
        transcription_text: Option<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            recording_id,
            status,
            transcription_text,
            error,
            timestamp: Utc::now(),
        }
    }
}
