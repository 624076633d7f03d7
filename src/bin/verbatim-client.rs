use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;

use verbatim::application::services::{
    ClientPoller, ClientRequest, PollerSettings, TranscriptionTarget,
};
use verbatim::domain::EngineKind;
use verbatim::infrastructure::job_api::HttpJobBackend;
use verbatim::infrastructure::observability::{TracingConfig, init_tracing};

/// Submit an audio file or URL for transcription and print the result chunks.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the job API
    #[arg(long, env = "VERBATIM_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Bearer token for the job API
    #[arg(long, env = "VERBATIM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// faster-whisper or stable-whisper
    #[arg(short, long, default_value = "faster-whisper")]
    engine: EngineKind,

    #[arg(short, long, default_value = "large-v3")]
    model: String,

    #[arg(long)]
    diarize: bool,

    #[arg(short, long)]
    language: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Local audio file or http(s) URL
    target: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(&TracingConfig::client())?;

    let cli = Cli::parse();

    let mut settings = PollerSettings::default();
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }

    let backend = HttpJobBackend::new(&cli.api_url, cli.api_key.clone(), settings.request_timeout)?;
    let poller = ClientPoller::new(Arc::new(backend), settings);

    let request = ClientRequest {
        engine: cli.engine,
        model: cli.model,
        target: TranscriptionTarget::parse(&cli.target),
        diarize: cli.diarize,
        language: cli.language,
    };

    match poller.transcribe(&request).await {
        Ok(chunks) => {
            for chunk in chunks {
                println!("{}", serde_json::to_string(&chunk)?);
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", json!({ "error": e.to_string() }));
            std::process::exit(1);
        }
    }
}
