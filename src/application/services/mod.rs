mod client_poller;
mod job_handler;
mod job_worker;
mod model_cache;
mod segment_chunker;
mod transcription_service;
mod webhook_dispatcher;

pub use client_poller::{
    ClientPoller, ClientRequest, PollerError, PollerPhase, PollerSettings, TranscriptionTarget,
    build_submission, check_payload_len,
};
pub use job_handler::{
    CANCELLED_MESSAGE, HandlerStream, JobEvent, JobEventStream, JobHandler, WebhookTarget,
};
pub use job_worker::{JobWorker, JobWorkerError};
pub use model_cache::{ModelCache, ModelHandle};
pub use segment_chunker::{ChunkStream, SegmentBatches, chunk_segments};
pub use transcription_service::{TranscriptionService, TranscriptionServiceError};
pub use webhook_dispatcher::{WebhookDelivery, WebhookDispatcher, WebhookWorker, webhook_channel};
