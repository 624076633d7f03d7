use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{JobId, JobStatus};

/// A submitted job as tracked by the local job runtime.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub input: Value,
    pub outputs: Vec<Value>,
    /// Number of outputs already handed to a stream reader.
    pub delivered: usize,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(input: Value) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::InQueue,
            input,
            outputs: Vec::new(),
            delivered: 0,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn pending_outputs(&self) -> &[Value] {
        self.outputs_from(self.delivered)
    }

    pub fn outputs_from(&self, offset: usize) -> &[Value] {
        &self.outputs[offset.min(self.outputs.len())..]
    }

    /// Drops the submitted input once nothing will read it again.
    pub fn release_input(&mut self) {
        self.input = Value::Null;
    }
}
