use serde::{Deserialize, Serialize};

use super::ResultChunk;

/// One item yielded by the job handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobOutput {
    /// `{"error": "..."}`; always the last item of a job.
    Error { error: String },
    /// `{"result": [...]}` for non-streaming jobs.
    Aggregate { result: Vec<ResultChunk> },
    /// A bare array of segments for streaming jobs.
    Chunk(ResultChunk),
}

impl JobOutput {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            _ => None,
        }
    }
}
