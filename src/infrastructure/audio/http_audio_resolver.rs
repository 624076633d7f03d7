use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::{Bytes, BytesMut};
use futures::stream::StreamExt;

use crate::application::ports::{AudioResolveError, AudioResolver};
use crate::domain::AudioSource;
use crate::infrastructure::observability::sanitize_url;

/// Decodes inline blobs and downloads `url` sources with a size cap.
pub struct HttpAudioResolver {
    client: reqwest::Client,
    max_download_bytes: u64,
}

impl HttpAudioResolver {
    pub fn new(client: reqwest::Client, max_download_bytes: u64) -> Self {
        Self {
            client,
            max_download_bytes,
        }
    }

    async fn download(&self, url: &str) -> Result<Bytes, AudioResolveError> {
        let max = self.max_download_bytes;

        tracing::debug!(url = %sanitize_url(url), "Downloading audio");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AudioResolveError::DownloadFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            return Err(AudioResolveError::DownloadFailed(format!(
                "status {}",
                response.status()
            )));
        }

        if let Some(size) = response.content_length().filter(|size| *size > max) {
            return Err(AudioResolveError::TooLarge { size, max });
        }

        let mut body = Box::pin(response.bytes_stream());
        let mut audio = BytesMut::new();

        while let Some(chunk) = body.next().await {
            let chunk =
                chunk.map_err(|e| AudioResolveError::DownloadFailed(format!("body: {}", e)))?;
            let size = (audio.len() + chunk.len()) as u64;
            if size > max {
                return Err(AudioResolveError::TooLarge { size, max });
            }
            audio.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = audio.len(), "Audio downloaded");

        Ok(audio.freeze())
    }
}

#[async_trait]
impl AudioResolver for HttpAudioResolver {
    async fn resolve(&self, source: &AudioSource) -> Result<Bytes, AudioResolveError> {
        match source {
            AudioSource::Blob(data) => STANDARD
                .decode(data.trim())
                .map(Bytes::from)
                .map_err(|e| AudioResolveError::InvalidBlob(e.to_string())),
            AudioSource::Url(url) => self.download(url).await,
        }
    }
}
