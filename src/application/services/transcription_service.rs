use std::sync::Arc;

use crate::application::ports::{
    AudioResolveError, AudioResolver, SegmentSource, TranscribeOptions, TranscriptionError,
};
use crate::domain::{EngineKind, TranscribeArgs};

use super::model_cache::ModelCache;
use super::segment_chunker::{ChunkStream, chunk_segments};

/// Resolves the model and audio for a job and turns the engine's output
/// into a chunk stream.
pub struct TranscriptionService {
    models: Arc<ModelCache>,
    audio: Arc<dyn AudioResolver>,
    max_chunk_chars: usize,
}

impl TranscriptionService {
    pub fn new(
        models: Arc<ModelCache>,
        audio: Arc<dyn AudioResolver>,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            models,
            audio,
            max_chunk_chars,
        }
    }

    pub fn models(&self) -> &Arc<ModelCache> {
        &self.models
    }

    /// Diarized jobs run as one blocking engine call and are batched;
    /// everything else streams one segment per chunk.
    #[tracing::instrument(skip(self, args, api_key), fields(diarize = args.diarize))]
    pub async fn run(
        &self,
        engine: EngineKind,
        model: &str,
        args: &TranscribeArgs,
        api_key: Option<String>,
    ) -> Result<ChunkStream, TranscriptionServiceError> {
        tracing::debug!("Transcribing");

        let handle = self
            .models
            .get_or_load(engine, model)
            .await
            .map_err(TranscriptionServiceError::Model)?;

        let audio = self
            .audio
            .resolve(&args.source)
            .await
            .map_err(TranscriptionServiceError::Audio)?;

        tracing::debug!(bytes = audio.len(), "Audio resolved");

        let options = TranscribeOptions::from_args(args, api_key);
        let model = handle.instance();

        let source = if args.diarize {
            let segments = model
                .transcribe(audio, &options)
                .await
                .map_err(TranscriptionServiceError::Engine)?;
            tracing::debug!(segments = segments.len(), "Engine returned full result");
            SegmentSource::Eager(segments)
        } else {
            let segments = model
                .transcribe_stream(audio, &options)
                .await
                .map_err(TranscriptionServiceError::Engine)?;
            SegmentSource::Lazy(segments)
        };

        Ok(chunk_segments(source, self.max_chunk_chars))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionServiceError {
    #[error("{0}")]
    Model(TranscriptionError),
    #[error("{0}")]
    Audio(AudioResolveError),
    #[error("{0}")]
    Engine(TranscriptionError),
}
