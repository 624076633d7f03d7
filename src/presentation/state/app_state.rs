use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::application::ports::JobStore;
use crate::application::services::ModelCache;
use crate::domain::JobId;

#[derive(Clone)]
pub struct AppState {
    pub job_store: Arc<dyn JobStore>,
    pub job_sender: mpsc::Sender<JobId>,
    pub models: Arc<ModelCache>,
    pub stream_wait: Duration,
}
