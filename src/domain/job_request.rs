use std::fmt;

use serde_json::{Map, Value};

use super::EngineKind;

/// Where the audio for a job comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Base64-encoded audio carried inline in the request.
    Blob(String),
    /// Remote file the worker downloads.
    Url(String),
}

impl fmt::Debug for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::Blob(data) => write!(f, "Blob({} base64 chars)", data.len()),
            AudioSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeArgs {
    pub source: AudioSource,
    pub diarize: bool,
    pub language: Option<String>,
    pub word_timestamps: Option<bool>,
    /// Engine-specific arguments forwarded untouched.
    pub extra: Map<String, Value>,
}

/// A validated transcription job.
#[derive(Clone, PartialEq)]
pub struct JobRequest {
    pub engine: EngineKind,
    pub model: String,
    pub streaming: bool,
    pub api_key: Option<String>,
    pub transcribe_args: TranscribeArgs,
    pub webhook_url: Option<String>,
    pub recording_id: Option<String>,
}

impl fmt::Debug for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRequest")
            .field("engine", &self.engine)
            .field("model", &self.model)
            .field("streaming", &self.streaming)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("transcribe_args", &self.transcribe_args)
            .field("webhook_url", &self.webhook_url)
            .field("recording_id", &self.recording_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("job input must be a JSON object.")]
    NotAnObject,
    #[error("engine should be 'faster-whisper' or 'stable-whisper', but is {0} instead.")]
    UnknownEngine(String),
    #[error("Model not provided.")]
    MissingModel,
    #[error("transcribe_args field not provided.")]
    MissingTranscribeArgs,
    #[error("transcribe_args must contain either 'blob' or 'url' field.")]
    MissingAudioSource,
    #[error("transcribe_args must contain only one of 'blob' or 'url' fields.")]
    AmbiguousAudioSource,
    #[error("field '{field}' must be {expected}.")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

const SOURCE_KEYS: [&str; 2] = ["blob", "url"];
const RESERVED_ARG_KEYS: [&str; 6] = ["blob", "url", "diarize", "language", "word_timestamps", "stream"];

impl JobRequest {
    /// Validates a raw job input. Checks run in a fixed order and the
    /// first failure is returned.
    pub fn from_input(input: &Value) -> Result<Self, ValidationError> {
        let input = input.as_object().ok_or(ValidationError::NotAnObject)?;

        let engine = match input.get("engine") {
            None | Some(Value::Null) => EngineKind::default(),
            Some(Value::String(name)) => name
                .parse()
                .map_err(|_| ValidationError::UnknownEngine(name.clone()))?,
            Some(other) => return Err(ValidationError::UnknownEngine(other.to_string())),
        };

        let model = match input.get("model") {
            None | Some(Value::Null) => return Err(ValidationError::MissingModel),
            Some(Value::String(name)) if name.trim().is_empty() => {
                return Err(ValidationError::MissingModel);
            }
            Some(Value::String(name)) => name.clone(),
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    field: "model",
                    expected: "a string",
                });
            }
        };

        let args = match input.get("transcribe_args") {
            None | Some(Value::Null) => return Err(ValidationError::MissingTranscribeArgs),
            Some(Value::Object(args)) if args.is_empty() => {
                return Err(ValidationError::MissingTranscribeArgs);
            }
            Some(Value::Object(args)) => args,
            Some(_) => {
                return Err(ValidationError::InvalidField {
                    field: "transcribe_args",
                    expected: "an object",
                });
            }
        };

        let transcribe_args = parse_transcribe_args(args)?;

        Ok(Self {
            engine,
            model,
            streaming: optional_bool(input, "streaming")?.unwrap_or(false),
            api_key: optional_string(input, "api_key")?,
            transcribe_args,
            webhook_url: optional_string(input, "webhook_url")?,
            recording_id: optional_string(input, "recording_id")?,
        })
    }
}

fn parse_transcribe_args(args: &Map<String, Value>) -> Result<TranscribeArgs, ValidationError> {
    let present = SOURCE_KEYS
        .iter()
        .filter(|key| args.get(**key).is_some_and(|value| !value.is_null()))
        .count();

    let source = match present {
        0 => return Err(ValidationError::MissingAudioSource),
        1 => {
            if let Some(blob) = optional_string(args, "blob")? {
                AudioSource::Blob(blob)
            } else if let Some(url) = optional_string(args, "url")? {
                AudioSource::Url(url)
            } else {
                return Err(ValidationError::MissingAudioSource);
            }
        }
        _ => return Err(ValidationError::AmbiguousAudioSource),
    };

    let extra = args
        .iter()
        .filter(|(key, _)| !RESERVED_ARG_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(TranscribeArgs {
        source,
        diarize: optional_bool(args, "diarize")?.unwrap_or(false),
        language: optional_string(args, "language")?,
        word_timestamps: optional_bool(args, "word_timestamps")?,
        extra,
    })
}

fn optional_string(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn optional_bool(
    map: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "a boolean",
        }),
    }
}
