use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::application::ports::{
    ModelLoader, SegmentStream, SpeechModel, TranscribeOptions, TranscriptionError,
};
use crate::domain::{EngineKind, Segment};

const DEFAULT_SCRIPT: [&str; 3] = [
    "This is a scripted transcription.",
    "No speech model was loaded.",
    "Configure a remote engine to transcribe real audio.",
];

const SEGMENT_SECONDS: f64 = 2.5;

/// Loader for local development: every model replays a fixed script.
pub struct ScriptedModelLoader {
    script: Vec<String>,
}

impl ScriptedModelLoader {
    pub fn new(script: Vec<String>) -> Self {
        Self { script }
    }
}

impl Default for ScriptedModelLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait]
impl ModelLoader for ScriptedModelLoader {
    async fn load(
        &self,
        engine: EngineKind,
        model: &str,
    ) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        tracing::debug!(engine = %engine, model = model, "Loading scripted model");
        Ok(Arc::new(ScriptedModel {
            script: self.script.clone(),
        }))
    }
}

pub struct ScriptedModel {
    script: Vec<String>,
}

impl ScriptedModel {
    fn segments(&self, diarize: bool) -> Vec<Segment> {
        self.script
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let start = i as f64 * SEGMENT_SECONDS;
                let mut segment = Segment::new(i as u64, start, start + SEGMENT_SECONDS, text.clone());
                if diarize {
                    segment.speakers = vec![format!("SPEAKER_{:02}", i % 2)];
                }
                segment
            })
            .collect()
    }
}

#[async_trait]
impl SpeechModel for ScriptedModel {
    async fn transcribe(
        &self,
        _audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<Vec<Segment>, TranscriptionError> {
        Ok(self.segments(options.diarize))
    }

    async fn transcribe_stream(
        &self,
        _audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<SegmentStream, TranscriptionError> {
        let segments = self.segments(options.diarize);
        Ok(Box::pin(futures::stream::iter(segments.into_iter().map(Ok))))
    }
}
