mod audio_resolver;
mod job_backend;
mod job_store;
mod repository_error;
mod speech_model;
mod webhook_notifier;

pub use audio_resolver::{AudioResolveError, AudioResolver};
pub use job_backend::{BackendError, JobBackend, JobOutputStream};
pub use job_store::{JobStore, StreamBatch};
pub use repository_error::RepositoryError;
pub use speech_model::{
    ModelLoader, SegmentSource, SegmentStream, SpeechModel, TranscribeOptions, TranscriptionError,
};
pub use webhook_notifier::{WebhookError, WebhookNotifier};
