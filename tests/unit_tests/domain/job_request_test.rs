use serde_json::json;

use verbatim::domain::{AudioSource, EngineKind, JobRequest, ValidationError};

#[test]
fn given_complete_input_when_validating_then_builds_request() {
    let input = json!({
        "engine": "stable-whisper",
        "model": "large-v3",
        "streaming": true,
        "api_key": "sk-job",
        "transcribe_args": {
            "url": "https://cdn.example.com/a.mp3",
            "diarize": true,
            "language": "en",
            "word_timestamps": true,
            "beam_size": 5,
            "vad_filter": true
        },
        "webhook_url": "https://hooks.example.com",
        "recording_id": "rec-1"
    });

    let request = JobRequest::from_input(&input).unwrap();

    assert_eq!(request.engine, EngineKind::StableWhisper);
    assert_eq!(request.model, "large-v3");
    assert!(request.streaming);
    assert_eq!(request.api_key.as_deref(), Some("sk-job"));
    assert_eq!(
        request.transcribe_args.source,
        AudioSource::Url("https://cdn.example.com/a.mp3".to_string())
    );
    assert!(request.transcribe_args.diarize);
    assert_eq!(request.transcribe_args.language.as_deref(), Some("en"));
    assert_eq!(request.transcribe_args.word_timestamps, Some(true));
    assert_eq!(request.transcribe_args.extra.len(), 2);
    assert_eq!(request.transcribe_args.extra["beam_size"], json!(5));
    assert_eq!(request.webhook_url.as_deref(), Some("https://hooks.example.com"));
    assert_eq!(request.recording_id.as_deref(), Some("rec-1"));
}

#[test]
fn given_minimal_input_when_validating_then_defaults_apply() {
    let input = json!({ "model": "base", "transcribe_args": { "blob": "AA==" } });

    let request = JobRequest::from_input(&input).unwrap();

    assert_eq!(request.engine, EngineKind::FasterWhisper);
    assert!(!request.streaming);
    assert!(!request.transcribe_args.diarize);
    assert_eq!(
        request.transcribe_args.source,
        AudioSource::Blob("AA==".to_string())
    );
    assert!(request.webhook_url.is_none());
}

#[test]
fn given_several_problems_when_validating_then_first_check_in_order_wins() {
    let input = json!({ "engine": "whisperx" });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::UnknownEngine("whisperx".to_string()))
    );

    let input = json!({ "engine": "faster-whisper" });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::MissingModel)
    );

    let input = json!({ "model": "base" });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::MissingTranscribeArgs)
    );

    let input = json!({ "model": "base", "transcribe_args": { "language": "en" } });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::MissingAudioSource)
    );
}

#[test]
fn given_empty_transcribe_args_when_validating_then_reports_missing_args() {
    let input = json!({ "model": "base", "transcribe_args": {} });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::MissingTranscribeArgs)
    );
}

#[test]
fn given_blob_and_url_when_validating_then_rejects_ambiguous_source() {
    let input = json!({
        "model": "base",
        "transcribe_args": { "blob": "AA==", "url": "https://cdn.example.com/a.mp3" }
    });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::AmbiguousAudioSource)
    );
}

#[test]
fn given_null_url_next_to_blob_when_validating_then_blob_is_used() {
    let input = json!({ "model": "base", "transcribe_args": { "blob": "AA==", "url": null } });

    let request = JobRequest::from_input(&input).unwrap();

    assert_eq!(
        request.transcribe_args.source,
        AudioSource::Blob("AA==".to_string())
    );
}

#[test]
fn given_wrong_field_types_when_validating_then_names_the_field() {
    let input = json!({ "model": 3, "transcribe_args": { "blob": "AA==" } });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::InvalidField {
            field: "model",
            expected: "a string"
        })
    );

    let input = json!({ "model": "base", "streaming": "yes", "transcribe_args": { "blob": "AA==" } });
    assert_eq!(
        JobRequest::from_input(&input),
        Err(ValidationError::InvalidField {
            field: "streaming",
            expected: "a boolean"
        })
    );
}

#[test]
fn given_non_object_input_when_validating_then_fails() {
    assert_eq!(
        JobRequest::from_input(&json!("transcribe this")),
        Err(ValidationError::NotAnObject)
    );
}

#[test]
fn given_validation_errors_when_displayed_then_messages_are_stable() {
    assert_eq!(ValidationError::MissingModel.to_string(), "Model not provided.");
    assert_eq!(
        ValidationError::MissingTranscribeArgs.to_string(),
        "transcribe_args field not provided."
    );
    assert_eq!(
        ValidationError::MissingAudioSource.to_string(),
        "transcribe_args must contain either 'blob' or 'url' field."
    );
}

#[test]
fn given_request_with_secrets_when_debug_printed_then_they_are_hidden() {
    let input = json!({
        "model": "base",
        "api_key": "sk-very-secret",
        "transcribe_args": { "blob": "QUJDREVGR0g=" }
    });

    let printed = format!("{:?}", JobRequest::from_input(&input).unwrap());

    assert!(!printed.contains("sk-very-secret"));
    assert!(!printed.contains("QUJDREVGR0g="));
    assert!(printed.contains("[REDACTED]"));
}
