mod engine_kind;
mod job;
mod job_id;
mod job_output;
mod job_request;
mod job_status;
pub mod limits;
mod result_chunk;
mod segment;
mod webhook_event;

pub use engine_kind::EngineKind;
pub use job::Job;
pub use job_id::JobId;
pub use job_output::JobOutput;
pub use job_request::{AudioSource, JobRequest, TranscribeArgs, ValidationError};
pub use job_status::JobStatus;
pub use result_chunk::{ResultChunk, transcript_text};
pub use segment::{Segment, Word};
pub use webhook_event::{WebhookEvent, WebhookStatus};
