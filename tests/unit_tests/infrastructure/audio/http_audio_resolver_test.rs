use axum::Router;
use axum::body::Body;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use bytes::Bytes;
use futures::stream;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use verbatim::application::ports::{AudioResolveError, AudioResolver};
use verbatim::domain::AudioSource;
use verbatim::infrastructure::audio::HttpAudioResolver;

async fn start_mock_file_server() -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route("/audio.wav", get(|| async { Bytes::from_static(b"RIFF....WAVE") }))
        .route("/big.wav", get(|| async { vec![0u8; 4096] }))
        .route(
            "/chunked.wav",
            get(|| async {
                let chunks = (0..8).map(|_| Ok::<_, std::io::Error>(Bytes::from(vec![1u8; 512])));
                Body::from_stream(stream::iter(chunks))
            }),
        )
        .route(
            "/missing.wav",
            get(|| async { (StatusCode::NOT_FOUND, "gone").into_response() }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn resolver(max_download_bytes: u64) -> HttpAudioResolver {
    HttpAudioResolver::new(reqwest::Client::new(), max_download_bytes)
}

#[tokio::test]
async fn given_base64_blob_when_resolving_then_returns_decoded_bytes() {
    let audio = resolver(1024)
        .resolve(&AudioSource::Blob("UklGRg==".to_string()))
        .await
        .unwrap();

    assert_eq!(audio.as_ref(), b"RIFF");
}

#[tokio::test]
async fn given_invalid_base64_when_resolving_then_returns_invalid_blob() {
    let result = resolver(1024)
        .resolve(&AudioSource::Blob("not base64!!".to_string()))
        .await;

    assert!(matches!(result, Err(AudioResolveError::InvalidBlob(_))));
}

#[tokio::test]
async fn given_reachable_url_when_resolving_then_downloads_file() {
    let (base_url, shutdown_tx) = start_mock_file_server().await;

    let audio = resolver(1024)
        .resolve(&AudioSource::Url(format!("{}/audio.wav", base_url)))
        .await
        .unwrap();

    assert_eq!(audio.as_ref(), b"RIFF....WAVE");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_declared_length_over_limit_when_resolving_then_returns_too_large() {
    let (base_url, shutdown_tx) = start_mock_file_server().await;

    let result = resolver(1024)
        .resolve(&AudioSource::Url(format!("{}/big.wav", base_url)))
        .await;

    assert!(matches!(
        result,
        Err(AudioResolveError::TooLarge { size: 4096, max: 1024 })
    ));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_streamed_body_over_limit_when_resolving_then_returns_too_large() {
    let (base_url, shutdown_tx) = start_mock_file_server().await;

    let result = resolver(2048)
        .resolve(&AudioSource::Url(format!("{}/chunked.wav", base_url)))
        .await;

    assert!(matches!(result, Err(AudioResolveError::TooLarge { max: 2048, .. })));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_file_when_resolving_then_returns_download_failed() {
    let (base_url, shutdown_tx) = start_mock_file_server().await;

    let result = resolver(1024)
        .resolve(&AudioSource::Url(format!("{}/missing.wav", base_url)))
        .await;

    assert!(matches!(result, Err(AudioResolveError::DownloadFailed(_))));
    shutdown_tx.send(()).ok();
}
