use std::pin::Pin;
use std::sync::Arc;

use futures::future;
use futures::stream::{Stream, StreamExt};
use serde_json::Value;

use crate::domain::{JobOutput, JobRequest, ResultChunk, WebhookEvent, transcript_text};

use super::transcription_service::{TranscriptionService, TranscriptionServiceError};
use super::webhook_dispatcher::WebhookDispatcher;

pub type HandlerStream = Pin<Box<dyn Stream<Item = JobOutput> + Send + 'static>>;

pub type JobEventStream = Pin<Box<dyn Stream<Item = JobEvent> + Send + 'static>>;

pub const CANCELLED_MESSAGE: &str = "Job was cancelled.";

/// Where a job's lifecycle webhooks go.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookTarget {
    pub url: String,
    pub recording_id: Option<String>,
}

/// One step of a job, as seen by whatever runs it.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// The job passed validation and its `transcribing` webhook was sent.
    Started(WebhookTarget),
    Output(JobOutput),
    /// The terminal webhook, held back until the runner has recorded how
    /// the job ended.
    Finished(WebhookTarget, WebhookEvent),
}

/// Runs one transcription job from raw input to a stream of outputs.
///
/// Invalid input yields a single error and nothing else. Streaming jobs
/// re-yield every chunk as it is produced; non-streaming jobs yield one
/// aggregate. Failures are reported as an error output, never raised.
#[derive(Clone)]
pub struct JobHandler {
    transcription: Arc<TranscriptionService>,
    webhooks: WebhookDispatcher,
}

impl JobHandler {
    pub fn new(transcription: Arc<TranscriptionService>, webhooks: WebhookDispatcher) -> Self {
        Self {
            transcription,
            webhooks,
        }
    }

    /// Outputs only. The terminal webhook is sent once the last output has
    /// been taken.
    pub fn handle(&self, input: Value) -> HandlerStream {
        let webhooks = self.webhooks.clone();

        Box::pin(self.events(input).filter_map(move |event| {
            let output = match event {
                JobEvent::Output(output) => Some(output),
                JobEvent::Finished(target, event) => {
                    webhooks.dispatch(&target.url, event);
                    None
                }
                JobEvent::Started(_) => None,
            };
            future::ready(output)
        }))
    }

    /// Like [`JobHandler::handle`], but the terminal webhook is returned as
    /// a [`JobEvent::Finished`] for the caller to deliver with
    /// [`JobHandler::complete`].
    pub fn events(&self, input: Value) -> JobEventStream {
        let this = self.clone();

        Box::pin(async_stream::stream! {
            let request = match JobRequest::from_input(&input) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(error = %e, "Rejected invalid job");
                    yield JobEvent::Output(JobOutput::error(e.to_string()));
                    return;
                }
            };
            drop(input);

            tracing::info!(
                engine = %request.engine,
                model = %request.model,
                streaming = request.streaming,
                "Job accepted"
            );

            let target = request.webhook_url.clone().map(|url| WebhookTarget {
                url,
                recording_id: request.recording_id.clone(),
            });
            if let Some(target) = &target {
                this.webhooks.dispatch(
                    &target.url,
                    WebhookEvent::transcribing(target.recording_id.clone()),
                );
                yield JobEvent::Started(target.clone());
            }

            let mut chunks = match this
                .transcription
                .run(
                    request.engine,
                    &request.model,
                    &request.transcribe_args,
                    request.api_key.clone(),
                )
                .await
            {
                Ok(chunks) => chunks,
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!(error = %message, "Transcription failed");
                    yield JobEvent::Output(JobOutput::error(message.clone()));
                    if let Some(target) = target {
                        let event = WebhookEvent::failed(target.recording_id.clone(), message);
                        yield JobEvent::Finished(target, event);
                    }
                    return;
                }
            };

            let mut collected: Vec<ResultChunk> = Vec::new();

            while let Some(item) = chunks.next().await {
                match item {
                    Ok(chunk) => {
                        if request.streaming {
                            yield JobEvent::Output(JobOutput::Chunk(chunk.clone()));
                        }
                        collected.push(chunk);
                    }
                    Err(e) => {
                        let message = TranscriptionServiceError::Engine(e).to_string();
                        tracing::error!(error = %message, "Transcription failed");
                        yield JobEvent::Output(JobOutput::error(message.clone()));
                        if let Some(target) = target {
                            let event = WebhookEvent::failed(target.recording_id.clone(), message);
                            yield JobEvent::Finished(target, event);
                        }
                        return;
                    }
                }
            }

            tracing::info!(chunks = collected.len(), "Transcription completed");

            let text = transcript_text(&collected);
            if !request.streaming {
                yield JobEvent::Output(JobOutput::Aggregate { result: collected });
            }
            if let Some(target) = target {
                let event = WebhookEvent::transcribed(target.recording_id.clone(), text);
                yield JobEvent::Finished(target, event);
            }
        })
    }

    /// Delivers a terminal webhook returned by [`JobHandler::events`].
    pub fn complete(&self, target: &WebhookTarget, event: WebhookEvent) {
        self.webhooks.dispatch(&target.url, event);
    }

    /// Tells the webhook target that the job was cancelled.
    pub fn cancelled(&self, target: &WebhookTarget) {
        self.webhooks.dispatch(
            &target.url,
            WebhookEvent::failed(target.recording_id.clone(), CANCELLED_MESSAGE.to_string()),
        );
    }
}
