use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use verbatim::application::ports::JobStore;
use verbatim::application::services::{
    JobHandler, JobWorker, ModelCache, TranscriptionService, webhook_channel,
};
use verbatim::infrastructure::audio::{HttpAudioResolver, ModelLoaderFactory};
use verbatim::infrastructure::observability::{TracingConfig, init_tracing};
use verbatim::infrastructure::persistence::InMemoryJobStore;
use verbatim::infrastructure::webhooks::HttpWebhookNotifier;
use verbatim::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::server(
        environment.as_str(),
        settings.logging.enable_json,
        settings.logging.level.as_str(),
    ))?;

    let engine_client = reqwest::Client::new();
    let download_client = reqwest::Client::builder()
        .timeout(settings.audio.download_timeout())
        .build()
        .context("Failed to build download client")?;
    let webhook_client = reqwest::Client::new();

    let loader = ModelLoaderFactory::create(&settings.engines, engine_client);
    let models = Arc::new(ModelCache::new(loader));
    let audio = Arc::new(HttpAudioResolver::new(
        download_client,
        settings.audio.max_download_bytes,
    ));
    let transcription = Arc::new(TranscriptionService::new(
        Arc::clone(&models),
        audio,
        settings.worker.max_chunk_chars,
    ));

    let notifier = Arc::new(HttpWebhookNotifier::new(
        webhook_client,
        settings.webhook.secret.clone(),
        settings.webhook.timeout(),
    ));
    let (webhooks, webhook_worker) = webhook_channel(settings.webhook.queue_capacity, notifier);
    tokio::spawn(webhook_worker.run());

    let handler = JobHandler::new(transcription, webhooks);
    let job_store: Arc<dyn JobStore> = Arc::new(InMemoryJobStore::with_retention(
        settings.worker.job_retention(),
    ));
    let (job_sender, job_receiver) = mpsc::channel(settings.worker.queue_capacity.max(1));
    let worker = JobWorker::new(job_receiver, Arc::clone(&job_store), handler);
    tokio::spawn(worker.run());

    let state = AppState {
        job_store,
        job_sender,
        models,
        stream_wait: settings.server.stream_wait(),
    };
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(
        address = %addr,
        environment = %environment,
        provider = ?settings.engines.provider,
        "Starting server"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
