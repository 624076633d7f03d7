use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures::stream::StreamExt;
use serde_json::{Map, json};

use verbatim::application::services::{
    ModelCache, TranscriptionService, TranscriptionServiceError,
};
use verbatim::domain::{AudioSource, EngineKind, ResultChunk, TranscribeArgs};

use crate::unit_tests::support::{CountingLoader, StaticAudio, segments};

fn args(source: AudioSource, diarize: bool) -> TranscribeArgs {
    let mut extra = Map::new();
    extra.insert("beam_size".to_string(), json!(5));
    TranscribeArgs {
        source,
        diarize,
        language: Some("en".to_string()),
        word_timestamps: Some(true),
        extra,
    }
}

fn service(loader: Arc<CountingLoader>, fail_urls: bool) -> TranscriptionService {
    TranscriptionService::new(
        Arc::new(ModelCache::new(loader)),
        Arc::new(StaticAudio { fail_urls }),
        500_000,
    )
}

#[tokio::test]
async fn given_diarize_when_running_then_uses_one_shot_call_and_batches() {
    let loader = Arc::new(CountingLoader::new(segments(&["a", "b", "c"])));
    let service = service(loader.clone(), false);

    let chunks: Vec<ResultChunk> = service
        .run(
            EngineKind::FasterWhisper,
            "large-v3",
            &args(AudioSource::Blob("AAAA".to_string()), true),
            None,
        )
        .await
        .unwrap()
        .map(|c| c.unwrap())
        .collect()
        .await;

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].len(), 3);
    assert_eq!(loader.calls.transcribe.load(Ordering::SeqCst), 1);
    assert_eq!(loader.calls.transcribe_stream.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_no_diarize_when_running_then_streams_one_segment_per_chunk() {
    let loader = Arc::new(CountingLoader::new(segments(&["a", "b", "c"])));
    let service = service(loader.clone(), false);

    let chunks: Vec<ResultChunk> = service
        .run(
            EngineKind::StableWhisper,
            "base",
            &args(AudioSource::Blob("AAAA".to_string()), false),
            None,
        )
        .await
        .unwrap()
        .map(|c| c.unwrap())
        .collect()
        .await;

    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.len() == 1));
    assert_eq!(loader.calls.transcribe_stream.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_job_arguments_when_running_then_options_reach_the_engine() {
    let loader = Arc::new(CountingLoader::new(segments(&["a"])));
    let service = service(loader.clone(), false);

    let _ = service
        .run(
            EngineKind::FasterWhisper,
            "large-v3",
            &args(AudioSource::Blob("AAAA".to_string()), false),
            Some("job-key".to_string()),
        )
        .await
        .unwrap();

    let options = loader.calls.options.lock().unwrap()[0].clone();
    assert_eq!(options.language.as_deref(), Some("en"));
    assert_eq!(options.word_timestamps, Some(true));
    assert_eq!(options.api_key.as_deref(), Some("job-key"));
    assert_eq!(options.extra.get("beam_size"), Some(&json!(5)));
}

#[tokio::test]
async fn given_unresolvable_audio_when_running_then_returns_audio_error_without_engine_call() {
    let loader = Arc::new(CountingLoader::new(segments(&["a"])));
    let service = service(loader.clone(), true);

    let result = service
        .run(
            EngineKind::FasterWhisper,
            "large-v3",
            &args(AudioSource::Url("https://example.com/a.wav".to_string()), false),
            None,
        )
        .await;

    assert!(matches!(result, Err(TranscriptionServiceError::Audio(_))));
    assert_eq!(loader.calls.total(), 0);
}

#[tokio::test]
async fn given_broken_model_when_running_then_returns_model_error() {
    let mut loader = CountingLoader::new(segments(&["a"]));
    loader.broken = vec!["nope".to_string()];
    let service = service(Arc::new(loader), false);

    let result = service
        .run(
            EngineKind::FasterWhisper,
            "nope",
            &args(AudioSource::Blob("AAAA".to_string()), false),
            None,
        )
        .await;

    match result {
        Err(TranscriptionServiceError::Model(e)) => {
            assert!(e.to_string().contains("no such model: nope"));
        }
        _ => panic!("expected model error"),
    }
}
