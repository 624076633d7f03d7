use std::time::Duration;

use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::domain::limits::{MAX_CHUNK_CHARS, MAX_DOWNLOAD_BYTES};

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub worker: WorkerSettings,
    pub engines: EngineSettings,
    pub audio: AudioSettings,
    pub webhook: WebhookSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// How long a stream request waits for new outputs before answering.
    pub stream_wait_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    pub queue_capacity: usize,
    pub max_chunk_chars: usize,
    /// How long finished jobs stay queryable.
    pub job_retention_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub provider: EngineProvider,
    pub faster_whisper_url: String,
    pub stable_whisper_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineProvider {
    Remote,
    Mock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub max_download_bytes: u64,
    pub download_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    pub secret: Option<String>,
    pub timeout_secs: u64,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers built-in defaults, `appsettings.{environment}.toml` and
    /// `APP_*` environment variables (`__` separates nested keys).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Self::builder(environment)?
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults plus the environment's settings file, without env overrides.
    pub fn builder(
        environment: Environment,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("server.stream_wait_ms", 2000_i64)?
            .set_default("worker.queue_capacity", 64_i64)?
            .set_default("worker.max_chunk_chars", MAX_CHUNK_CHARS as i64)?
            .set_default("worker.job_retention_secs", 3600_i64)?
            .set_default("engines.provider", "remote")?
            .set_default("engines.faster_whisper_url", "http://localhost:8000/v1")?
            .set_default("engines.stable_whisper_url", "http://localhost:8001/v1")?
            .set_default("audio.max_download_bytes", MAX_DOWNLOAD_BYTES as i64)?
            .set_default("audio.download_timeout_secs", 300_i64)?
            .set_default("webhook.timeout_secs", 10_i64)?
            .set_default("webhook.queue_capacity", 64_i64)?
            .set_default("logging.level", "info,verbatim=debug,tower_http=debug")?
            .set_default("logging.enable_json", false)?
            .add_source(File::with_name(&environment.settings_file()).required(false)))
    }
}

impl ServerSettings {
    pub fn stream_wait(&self) -> Duration {
        Duration::from_millis(self.stream_wait_ms)
    }
}

impl WorkerSettings {
    pub fn job_retention(&self) -> Duration {
        Duration::from_secs(self.job_retention_secs)
    }
}

impl AudioSettings {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl WebhookSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
