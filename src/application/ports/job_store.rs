use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Job, JobId, JobStatus};

use super::RepositoryError;

/// Outputs handed to one stream reader, with the job status at that time.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamBatch {
    pub status: JobStatus,
    pub outputs: Vec<Value>,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn status(&self, id: JobId) -> Result<Option<JobStatus>, RepositoryError>;

    /// Moves a job to `status`. Terminal jobs cannot be moved, and a job
    /// entering a terminal status no longer keeps its input.
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;

    async fn append_output(&self, id: JobId, output: Value) -> Result<(), RepositoryError>;

    /// Returns the outputs not yet delivered and marks them delivered.
    async fn take_pending(&self, id: JobId) -> Result<Option<StreamBatch>, RepositoryError>;

    /// Returns the outputs from `offset` on without marking anything
    /// delivered.
    async fn read_outputs(
        &self,
        id: JobId,
        offset: usize,
    ) -> Result<Option<StreamBatch>, RepositoryError>;
}
