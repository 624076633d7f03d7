use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use serde_json::{Map, Value};

use crate::domain::{EngineKind, Segment, TranscribeArgs};

pub type SegmentStream =
    Pin<Box<dyn Stream<Item = Result<Segment, TranscriptionError>> + Send + 'static>>;

/// Engine output, tagged by how it was produced.
pub enum SegmentSource {
    /// A fully materialized result (diarized runs).
    Eager(Vec<Segment>),
    /// Segments arriving while the engine is still decoding.
    Lazy(SegmentStream),
}

/// Per-call options handed to an engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscribeOptions {
    pub language: Option<String>,
    pub word_timestamps: Option<bool>,
    pub diarize: bool,
    pub extra: Map<String, Value>,
    pub api_key: Option<String>,
}

impl TranscribeOptions {
    pub fn from_args(args: &TranscribeArgs, api_key: Option<String>) -> Self {
        Self {
            language: args.language.clone(),
            word_timestamps: args.word_timestamps,
            diarize: args.diarize,
            extra: args.extra.clone(),
            api_key,
        }
    }
}

/// A loaded speech-recognition model.
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// Transcribes the whole input and returns every segment at once.
    async fn transcribe(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<Vec<Segment>, TranscriptionError>;

    /// Starts a transcription whose segments are yielded as they are decoded.
    async fn transcribe_stream(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<SegmentStream, TranscriptionError>;
}

#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(
        &self,
        engine: EngineKind,
        model: &str,
    ) -> Result<Arc<dyn SpeechModel>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
