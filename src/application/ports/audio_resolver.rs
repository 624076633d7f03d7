use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::AudioSource;

/// Turns a job's audio reference into raw audio bytes.
#[async_trait]
pub trait AudioResolver: Send + Sync {
    async fn resolve(&self, source: &AudioSource) -> Result<Bytes, AudioResolveError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioResolveError {
    #[error("invalid audio blob: {0}")]
    InvalidBlob(String),
    #[error("audio download failed: {0}")]
    DownloadFailed(String),
    #[error("audio file is {size} bytes, exceeding the download limit of {max} bytes")]
    TooLarge { size: u64, max: u64 },
}
