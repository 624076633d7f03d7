use bytes::Bytes;

use verbatim::application::ports::TranscribeOptions;
use verbatim::domain::EngineKind;
use verbatim::infrastructure::audio::ModelLoaderFactory;
use verbatim::presentation::{EngineProvider, EngineSettings};

fn settings(provider: EngineProvider) -> EngineSettings {
    EngineSettings {
        provider,
        faster_whisper_url: "http://127.0.0.1:9/v1".to_string(),
        stable_whisper_url: "http://127.0.0.1:9/v1".to_string(),
        api_key: None,
    }
}

#[tokio::test]
async fn given_mock_provider_when_creating_loader_then_models_load_without_a_server() {
    let loader = ModelLoaderFactory::create(&settings(EngineProvider::Mock), reqwest::Client::new());

    let model = loader.load(EngineKind::FasterWhisper, "large-v3").await.unwrap();
    let segments = model
        .transcribe(Bytes::new(), &TranscribeOptions::default())
        .await
        .unwrap();

    assert!(!segments.is_empty());
}

#[tokio::test]
async fn given_remote_provider_without_server_when_loading_then_fails() {
    let loader =
        ModelLoaderFactory::create(&settings(EngineProvider::Remote), reqwest::Client::new());

    let result = loader.load(EngineKind::StableWhisper, "large-v3").await;

    assert!(result.is_err());
}
