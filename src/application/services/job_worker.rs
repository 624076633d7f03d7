use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::Instrument;

use crate::application::ports::{JobStore, RepositoryError};
use crate::domain::{JobId, JobStatus, WebhookEvent};

use super::job_handler::{JobEvent, JobHandler, WebhookTarget};

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs queued jobs one at a time, recording every handler output.
///
/// A job's terminal webhook goes out only after its final status is
/// stored, so a job cancelled mid-run reports the cancellation instead.
pub struct JobWorker {
    receiver: mpsc::Receiver<JobId>,
    store: Arc<dyn JobStore>,
    handler: JobHandler,
}

impl JobWorker {
    pub fn new(
        receiver: mpsc::Receiver<JobId>,
        store: Arc<dyn JobStore>,
        handler: JobHandler,
    ) -> Self {
        Self {
            receiver,
            store,
            handler,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Job worker started");
        while let Some(job_id) = self.receiver.recv().await {
            let span = tracing::info_span!("transcription_job", job_id = %job_id);

            if let Err(e) = self.process_job(job_id).instrument(span).await {
                tracing::error!(job_id = %job_id, error = %e, "Job processing failed");
            }
        }
        tracing::info!("Job worker stopped: channel closed");
    }

    async fn process_job(&self, job_id: JobId) -> Result<(), JobWorkerError> {
        let job = self
            .store
            .get_by_id(job_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(job_id.to_string()))?;

        if job.status != JobStatus::InQueue {
            tracing::info!(status = %job.status, "Skipping job that left the queue");
            return Ok(());
        }

        self.store
            .update_status(job_id, JobStatus::InProgress, None)
            .await?;
        tracing::debug!("Job status transition: IN_PROGRESS");

        let mut events = self.handler.events(job.input);
        let mut target: Option<WebhookTarget> = None;
        let mut completion: Option<(WebhookTarget, WebhookEvent)> = None;
        let mut failure: Option<String> = None;
        let mut produced = 0usize;

        let mut cancel_check = tokio::time::interval(CANCEL_POLL_INTERVAL);
        cancel_check.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                event = events.next() => event,
                _ = cancel_check.tick() => {
                    if self.is_cancelled(job_id).await? {
                        drop(events);
                        self.report_cancelled(target.as_ref(), produced);
                        return Ok(());
                    }
                    continue;
                }
            };

            let Some(event) = event else {
                break;
            };

            match event {
                JobEvent::Started(started) => target = Some(started),
                JobEvent::Finished(finished, event) => completion = Some((finished, event)),
                JobEvent::Output(output) => {
                    if self.is_cancelled(job_id).await? {
                        drop(events);
                        self.report_cancelled(target.as_ref(), produced);
                        return Ok(());
                    }

                    if let Some(message) = output.error_message() {
                        failure = Some(message.to_string());
                    }

                    let value = serde_json::to_value(&output)
                        .map_err(|e| JobWorkerError::Serialization(e.to_string()))?;
                    self.store.append_output(job_id, value).await?;
                    produced += 1;
                }
            }
        }

        let (status, error) = match &failure {
            Some(message) => (JobStatus::Failed, Some(message.as_str())),
            None => (JobStatus::Completed, None),
        };

        match self.store.update_status(job_id, status, error).await {
            Ok(()) => {
                tracing::info!(status = %status, outputs = produced, "Job finished");
                if let Some((finished, event)) = completion {
                    self.handler.complete(&finished, event);
                }
                Ok(())
            }
            Err(RepositoryError::InvalidTransition(reason)) => {
                tracing::info!(reason = %reason, "Job was closed before it finished");
                self.report_cancelled(target.as_ref(), produced);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn is_cancelled(&self, job_id: JobId) -> Result<bool, RepositoryError> {
        Ok(self.store.status(job_id).await? == Some(JobStatus::Cancelled))
    }

    fn report_cancelled(&self, target: Option<&WebhookTarget>, produced: usize) {
        tracing::info!(outputs = produced, "Job cancelled, stopping transcription");
        if let Some(target) = target {
            self.handler.cancelled(target);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobWorkerError {
    #[error("job store: {0}")]
    Repository(#[from] RepositoryError),
    #[error("serialization: {0}")]
    Serialization(String),
}
