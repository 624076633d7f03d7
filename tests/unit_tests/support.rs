use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use verbatim::application::ports::{
    AudioResolveError, AudioResolver, ModelLoader, SegmentStream, SpeechModel, TranscribeOptions,
    TranscriptionError,
};
use verbatim::domain::{AudioSource, EngineKind, Segment};

pub fn segments(texts: &[&str]) -> Vec<Segment> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| Segment::new(i as u64, i as f64, i as f64 + 1.0, *text))
        .collect()
}

/// Calls seen by a [`FixedModel`], shared with the test.
#[derive(Default)]
pub struct ModelCalls {
    pub transcribe: AtomicUsize,
    pub transcribe_stream: AtomicUsize,
    pub options: Mutex<Vec<TranscribeOptions>>,
}

impl ModelCalls {
    pub fn total(&self) -> usize {
        self.transcribe.load(Ordering::SeqCst) + self.transcribe_stream.load(Ordering::SeqCst)
    }
}

/// Returns the same segments for every call. A stream can be told to fail
/// after a number of segments.
pub struct FixedModel {
    pub segments: Vec<Segment>,
    pub fail_stream_after: Option<usize>,
    pub calls: Arc<ModelCalls>,
}

#[async_trait]
impl SpeechModel for FixedModel {
    async fn transcribe(
        &self,
        _audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<Vec<Segment>, TranscriptionError> {
        self.calls.transcribe.fetch_add(1, Ordering::SeqCst);
        self.calls.options.lock().unwrap().push(options.clone());
        Ok(self.segments.clone())
    }

    async fn transcribe_stream(
        &self,
        _audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<SegmentStream, TranscriptionError> {
        self.calls.transcribe_stream.fetch_add(1, Ordering::SeqCst);
        self.calls.options.lock().unwrap().push(options.clone());

        let mut items: Vec<Result<Segment, TranscriptionError>> =
            self.segments.iter().cloned().map(Ok).collect();
        if let Some(after) = self.fail_stream_after {
            items.truncate(after);
            items.push(Err(TranscriptionError::TranscriptionFailed(
                "CUDA out of memory".to_string(),
            )));
        }
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

/// Counts loads and hands out [`FixedModel`]s. Models named in `broken`
/// fail to load.
pub struct CountingLoader {
    pub loads: AtomicUsize,
    pub segments: Vec<Segment>,
    pub broken: Vec<String>,
    pub fail_stream_after: Option<usize>,
    pub calls: Arc<ModelCalls>,
}

impl CountingLoader {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            loads: AtomicUsize::new(0),
            segments,
            broken: Vec::new(),
            fail_stream_after: None,
            calls: Arc::new(ModelCalls::default()),
        }
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for CountingLoader {
    async fn load(
        &self,
        _engine: EngineKind,
        model: &str,
    ) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.broken.iter().any(|b| b == model) {
            return Err(TranscriptionError::ModelLoadFailed(format!(
                "no such model: {}",
                model
            )));
        }
        Ok(Arc::new(FixedModel {
            segments: self.segments.clone(),
            fail_stream_after: self.fail_stream_after,
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// Resolves every source to the same bytes. URL sources can be made to fail.
pub struct StaticAudio {
    pub fail_urls: bool,
}

#[async_trait]
impl AudioResolver for StaticAudio {
    async fn resolve(&self, source: &AudioSource) -> Result<Bytes, AudioResolveError> {
        match source {
            AudioSource::Url(url) if self.fail_urls => Err(AudioResolveError::DownloadFailed(
                format!("status 404 Not Found for {}", url),
            )),
            _ => Ok(Bytes::from_static(b"RIFF fake wav")),
        }
    }
}
