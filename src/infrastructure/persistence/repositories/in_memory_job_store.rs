use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{JobStore, RepositoryError, StreamBatch};
use crate::domain::{Job, JobId, JobStatus};

pub const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

/// Process-local job state for the job API.
///
/// Terminal jobs are evicted once they have been idle for the retention
/// period; eviction runs whenever a job is created.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
    retention: Duration,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_JOB_RETENTION)
    }

    pub fn with_retention(retention: Duration) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            retention,
        }
    }

    fn evict_expired(&self, jobs: &mut HashMap<JobId, Job>) {
        let Ok(retention) = TimeDelta::from_std(self.retention) else {
            return;
        };
        let Some(cutoff) = Utc::now().checked_sub_signed(retention) else {
            return;
        };

        let before = jobs.len();
        jobs.retain(|_, job| !job.status.is_terminal() || job.updated_at > cutoff);
        let evicted = before - jobs.len();
        if evicted > 0 {
            tracing::debug!(evicted = evicted, "Evicted expired jobs");
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        self.evict_expired(&mut jobs);
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn status(&self, id: JobId) -> Result<Option<JobStatus>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).map(|job| job.status))
    }

    #[instrument(skip(self, error_message), fields(job_id = %id))]
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if job.status.is_terminal() {
            return Err(RepositoryError::InvalidTransition(format!(
                "{} -> {}",
                job.status, status
            )));
        }

        job.status = status;
        job.error_message = error_message.map(String::from);
        job.updated_at = Utc::now();
        if status.is_terminal() {
            job.release_input();
        }
        Ok(())
    }

    async fn append_output(&self, id: JobId, output: Value) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        job.outputs.push(output);
        job.updated_at = Utc::now();
        Ok(())
    }

    async fn take_pending(&self, id: JobId) -> Result<Option<StreamBatch>, RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };

        let outputs = job.pending_outputs().to_vec();
        job.delivered = job.outputs.len();

        Ok(Some(StreamBatch {
            status: job.status,
            outputs,
        }))
    }

    async fn read_outputs(
        &self,
        id: JobId,
        offset: usize,
    ) -> Result<Option<StreamBatch>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).map(|job| StreamBatch {
            status: job.status,
            outputs: job.outputs_from(offset).to_vec(),
        }))
    }
}
