use async_trait::async_trait;

use crate::domain::WebhookEvent;

#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook request failed: {0}")]
    RequestFailed(String),
    #[error("webhook rejected with status {0}")]
    Rejected(u16),
    #[error("webhook signing failed: {0}")]
    Signing(String),
}
