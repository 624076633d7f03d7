use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::stream::StreamExt;
use serde_json::{Map, Value, json};

use crate::application::ports::{BackendError, JobBackend};
use crate::domain::limits::MAX_PAYLOAD_BYTES;
use crate::domain::{EngineKind, JobOutput, JobStatus, ResultChunk};

const DEFAULT_QUEUE_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_QUEUE_POLLS: u32 = 300;
const DEFAULT_MAX_STREAM_TIMEOUTS: u32 = 5;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub queue_poll_interval: Duration,
    pub max_queue_polls: u32,
    pub max_stream_timeouts: u32,
    /// Applied by the backend to each HTTP request.
    pub request_timeout: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            queue_poll_interval: DEFAULT_QUEUE_POLL_INTERVAL,
            max_queue_polls: DEFAULT_MAX_QUEUE_POLLS,
            max_stream_timeouts: DEFAULT_MAX_STREAM_TIMEOUTS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Audio to submit: a local file sent inline, or a URL the worker fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionTarget {
    File(PathBuf),
    Url(String),
}

impl TranscriptionTarget {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientRequest {
    pub engine: EngineKind,
    pub model: String,
    pub target: TranscriptionTarget,
    pub diarize: bool,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    Submitted,
    InQueue,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for PollerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollerPhase::Submitted => "SUBMITTED",
            PollerPhase::InQueue => "IN_QUEUE",
            PollerPhase::Streaming => "STREAMING",
            PollerPhase::Completed => "COMPLETED",
            PollerPhase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Payload length is {len}, exceeding max payload length of {max}.")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("failed to read audio file: {0}")]
    Io(String),
    #[error("{0}")]
    Backend(BackendError),
    #[error("{0}")]
    JobFailed(String),
    #[error("Number of stream timeouts exceeded the maximum ({0}).")]
    StreamTimeouts(u32),
    #[error("Exception during stream: {0}")]
    StreamFailed(String),
}

/// Submits a job and follows it through the queue and its result stream.
pub struct ClientPoller {
    backend: Arc<dyn JobBackend>,
    settings: PollerSettings,
}

impl ClientPoller {
    pub fn new(backend: Arc<dyn JobBackend>, settings: PollerSettings) -> Self {
        Self { backend, settings }
    }

    pub async fn transcribe(
        &self,
        request: &ClientRequest,
    ) -> Result<Vec<ResultChunk>, PollerError> {
        let body = build_submission(request).await?;
        check_payload_len(body.len())?;

        let job_id = self
            .backend
            .submit(body)
            .await
            .map_err(PollerError::Backend)?;
        tracing::info!(job_id = %job_id, phase = %PollerPhase::Submitted, "Job submitted");

        self.wait_in_queue(&job_id).await?;

        let result = self.collect_stream(&job_id).await;
        let phase = if result.is_ok() {
            PollerPhase::Completed
        } else {
            PollerPhase::Failed
        };
        tracing::info!(job_id = %job_id, phase = %phase, "Job finished");
        result
    }

    /// Polls while the job is queued. Running out of polls is not fatal:
    /// streaming is attempted regardless.
    async fn wait_in_queue(&self, job_id: &str) -> Result<(), PollerError> {
        for _ in 0..self.settings.max_queue_polls {
            let status = self
                .backend
                .status(job_id)
                .await
                .map_err(PollerError::Backend)?;

            if status != JobStatus::InQueue {
                tracing::debug!(job_id = job_id, status = %status, "Job left the queue");
                return Ok(());
            }

            tracing::debug!(job_id = job_id, phase = %PollerPhase::InQueue, "Waiting for worker");
            tokio::time::sleep(self.settings.queue_poll_interval).await;
        }

        tracing::warn!(
            job_id = job_id,
            polls = self.settings.max_queue_polls,
            "Job still queued, streaming anyway"
        );
        Ok(())
    }

    async fn collect_stream(&self, job_id: &str) -> Result<Vec<ResultChunk>, PollerError> {
        let mut chunks: Vec<ResultChunk> = Vec::new();
        let mut received = 0usize;
        let mut timeouts = 0u32;

        loop {
            tracing::debug!(job_id = job_id, offset = received, phase = %PollerPhase::Streaming, "Reading stream");
            let mut stream = self.backend.stream(job_id, received);

            let outcome = loop {
                match stream.next().await {
                    Some(Ok(value)) => match serde_json::from_value::<JobOutput>(value) {
                        Ok(JobOutput::Error { error }) => return Err(PollerError::JobFailed(error)),
                        Ok(JobOutput::Aggregate { result }) => {
                            received += 1;
                            chunks.extend(result);
                        }
                        Ok(JobOutput::Chunk(chunk)) => {
                            received += 1;
                            chunks.push(chunk);
                        }
                        Err(e) => break Err(BackendError::InvalidResponse(e.to_string())),
                    },
                    Some(Err(e)) => break Err(e),
                    None => break Ok(()),
                }
            };

            match outcome {
                Ok(()) => return Ok(chunks),
                Err(BackendError::ReadTimeout) => {
                    timeouts += 1;
                    if timeouts > self.settings.max_stream_timeouts {
                        return Err(PollerError::StreamTimeouts(
                            self.settings.max_stream_timeouts,
                        ));
                    }
                    tracing::warn!(job_id = job_id, timeouts = timeouts, "Stream read timed out, retrying");
                }
                Err(e) => {
                    if let Err(cancel_err) = self.backend.cancel(job_id).await {
                        tracing::warn!(job_id = job_id, error = %cancel_err, "Failed to cancel job");
                    }
                    return Err(PollerError::StreamFailed(e.to_string()));
                }
            }
        }
    }
}

/// Serializes the submission body for `request`, inlining local files as
/// base64 blobs.
pub async fn build_submission(request: &ClientRequest) -> Result<String, PollerError> {
    let mut args = Map::new();

    match &request.target {
        TranscriptionTarget::File(path) => {
            let audio = tokio::fs::read(path)
                .await
                .map_err(|e| PollerError::Io(format!("{}: {}", path.display(), e)))?;
            args.insert("blob".to_string(), Value::String(STANDARD.encode(audio)));
        }
        TranscriptionTarget::Url(url) => {
            args.insert("url".to_string(), Value::String(url.clone()));
        }
    }

    if request.diarize {
        args.insert("diarize".to_string(), Value::Bool(true));
    }
    if let Some(language) = &request.language {
        args.insert("language".to_string(), Value::String(language.clone()));
    }

    let body = json!({
        "input": {
            "engine": request.engine.as_str(),
            "model": request.model,
            "streaming": true,
            "transcribe_args": args,
        }
    });

    Ok(body.to_string())
}

pub fn check_payload_len(len: usize) -> Result<(), PollerError> {
    if len > MAX_PAYLOAD_BYTES {
        return Err(PollerError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(())
}
