use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;
use serde_json::Value;

use crate::domain::JobStatus;

pub type JobOutputStream =
    Pin<Box<dyn Stream<Item = Result<Value, BackendError>> + Send + 'static>>;

/// Remote job API a client submits transcription jobs to.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Submits a serialized `{"input": ...}` body and returns the job id.
    async fn submit(&self, body: String) -> Result<String, BackendError>;

    async fn status(&self, job_id: &str) -> Result<JobStatus, BackendError>;

    /// Streams the job's outputs from `offset` on until it reaches a
    /// terminal state. `offset` counts outputs the caller already holds, so
    /// a retry after a dropped read asks for the same outputs again.
    fn stream(&self, job_id: &str, offset: usize) -> JobOutputStream;

    async fn cancel(&self, job_id: &str) -> Result<(), BackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("read timed out")]
    ReadTimeout,
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("job not found: {0}")]
    NotFound(String),
}
