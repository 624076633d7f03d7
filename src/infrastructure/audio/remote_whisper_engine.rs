use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{
    ModelLoader, SegmentStream, SpeechModel, TranscribeOptions, TranscriptionError,
};
use crate::domain::{EngineKind, Segment, Word};

/// Base URLs of the OpenAI-compatible speech servers backing each engine.
#[derive(Debug, Clone)]
pub struct EngineEndpoints {
    pub faster_whisper: String,
    pub stable_whisper: String,
}

impl EngineEndpoints {
    fn base_url(&self, engine: EngineKind) -> &str {
        let url = match engine {
            EngineKind::FasterWhisper => &self.faster_whisper,
            EngineKind::StableWhisper => &self.stable_whisper,
        };
        url.trim_end_matches('/')
    }
}

pub struct RemoteModelLoader {
    client: reqwest::Client,
    endpoints: EngineEndpoints,
    api_key: Option<String>,
}

impl RemoteModelLoader {
    pub fn new(client: reqwest::Client, endpoints: EngineEndpoints, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoints,
            api_key,
        }
    }
}

#[async_trait]
impl ModelLoader for RemoteModelLoader {
    async fn load(
        &self,
        engine: EngineKind,
        model: &str,
    ) -> Result<Arc<dyn SpeechModel>, TranscriptionError> {
        let base_url = self.endpoints.base_url(engine).to_string();
        let url = format!("{}/models/{}", base_url, model);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("request: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TranscriptionError::ModelLoadFailed(format!(
                "model {} is not available on the {} server",
                model, engine
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::ModelLoadFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        tracing::info!(engine = %engine, model = model, "Remote model ready");

        Ok(Arc::new(RemoteWhisperModel {
            client: self.client.clone(),
            base_url,
            model: model.to_string(),
            api_key: self.api_key.clone(),
        }))
    }
}

pub struct RemoteWhisperModel {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct VerboseTranscription {
    #[serde(default)]
    segments: Vec<Segment>,
    #[serde(default)]
    words: Vec<Word>,
}

enum StreamEvent {
    Segment(Segment),
    Done,
}

impl RemoteWhisperModel {
    fn build_form(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
        stream: bool,
    ) -> Result<multipart::Form, TranscriptionError> {
        let file_part = multipart::Part::bytes(audio.to_vec())
            .file_name("audio")
            .mime_str("application/octet-stream")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("timestamp_granularities[]", "segment")
            .part("file", file_part);

        if options.word_timestamps == Some(true) {
            form = form.text("timestamp_granularities[]", "word");
        }
        if let Some(language) = &options.language {
            form = form.text("language", language.clone());
        }
        if options.diarize {
            form = form.text("diarize", "true");
        }
        if stream {
            form = form.text("stream", "true");
        }
        for (key, value) in &options.extra {
            let field = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(key.clone(), field);
        }

        Ok(form)
    }

    async fn send(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
        stream: bool,
    ) -> Result<reqwest::Response, TranscriptionError> {
        let form = self.build_form(audio, options, stream)?;
        let url = format!("{}/audio/transcriptions", self.base_url);

        let mut request = self.client.post(&url).multipart(form);
        if let Some(key) = options.api_key.as_ref().or(self.api_key.as_ref()) {
            request = request.bearer_auth(key);
        }

        tracing::debug!(model = %self.model, stream = stream, "Sending audio to speech server");

        let response = request
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::TranscriptionFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl SpeechModel for RemoteWhisperModel {
    async fn transcribe(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<Vec<Segment>, TranscriptionError> {
        let response = self.send(audio, options, false).await?;

        let result: VerboseTranscription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("parse response: {}", e)))?;

        let segments = attach_words(result.segments, result.words);

        tracing::info!(
            segments = segments.len(),
            "Remote transcription completed"
        );

        Ok(segments)
    }

    async fn transcribe_stream(
        &self,
        audio: Bytes,
        options: &TranscribeOptions,
    ) -> Result<SegmentStream, TranscriptionError> {
        let response = self.send(audio, options, true).await?;
        let mut body = Box::pin(response.bytes_stream());

        Ok(Box::pin(async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(TranscriptionError::ApiRequestFailed(format!("stream: {}", e)));
                        return;
                    }
                };
                buffer.extend_from_slice(&chunk);

                while let Some(newline) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=newline).collect();
                    match parse_event_line(&String::from_utf8_lossy(&line)) {
                        Some(Ok(StreamEvent::Segment(segment))) => yield Ok(segment),
                        Some(Ok(StreamEvent::Done)) => return,
                        Some(Err(e)) => {
                            yield Err(e);
                            return;
                        }
                        None => {}
                    }
                }
            }

            if let Some(event) = parse_event_line(&String::from_utf8_lossy(&buffer)) {
                match event {
                    Ok(StreamEvent::Segment(segment)) => yield Ok(segment),
                    Ok(StreamEvent::Done) => {}
                    Err(e) => yield Err(e),
                }
            }
        }))
    }
}

fn parse_event_line(line: &str) -> Option<Result<StreamEvent, TranscriptionError>> {
    let data = line.trim().strip_prefix("data:")?.trim();

    if data.is_empty() {
        return None;
    }
    if data == "[DONE]" {
        return Some(Ok(StreamEvent::Done));
    }

    Some(
        serde_json::from_str::<Segment>(data)
            .map(StreamEvent::Segment)
            .map_err(|e| TranscriptionError::InvalidResponse(format!("segment event: {}", e))),
    )
}

/// Distributes top-level word timings onto the segments that contain them,
/// for servers that report words separately from segments.
fn attach_words(mut segments: Vec<Segment>, words: Vec<Word>) -> Vec<Segment> {
    if words.is_empty() || segments.iter().any(|s| !s.words.is_empty()) {
        return segments;
    }

    let mut words = words.into_iter().peekable();
    let last = segments.len().saturating_sub(1);

    for (index, segment) in segments.iter_mut().enumerate() {
        while let Some(word) = words.peek() {
            if index != last && word.start >= segment.end {
                break;
            }
            if let Some(word) = words.next() {
                segment.words.push(word);
            }
        }
    }

    segments
}
