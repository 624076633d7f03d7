use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::application::ports::{WebhookError, WebhookNotifier};
use crate::domain::WebhookEvent;
use crate::infrastructure::observability::sanitize_url;

use super::signature::{SIGNATURE_HEADER, sign_payload};

pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts webhook events as JSON, signed when a secret is configured.
pub struct HttpWebhookNotifier {
    client: reqwest::Client,
    secret: Option<String>,
    timeout: Duration,
}

impl HttpWebhookNotifier {
    pub fn new(client: reqwest::Client, secret: Option<String>, timeout: Duration) -> Self {
        Self {
            client,
            secret: secret.filter(|s| !s.is_empty()),
            timeout,
        }
    }
}

/// Serializes `event` with keys in sorted order, the exact bytes that are
/// signed and sent.
pub fn webhook_body(event: &WebhookEvent) -> String {
    let mut body: BTreeMap<&str, Value> = BTreeMap::new();
    body.insert(
        "recording_id",
        event
            .recording_id
            .clone()
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    body.insert("status", Value::String(event.status.as_str().to_string()));
    body.insert("timestamp", Value::String(event.timestamp.to_rfc3339()));
    if let Some(text) = &event.transcription_text {
        body.insert("transcription", Value::String(text.clone()));
    }
    if let Some(error) = &event.error {
        body.insert("error", Value::String(error.clone()));
    }

    serde_json::to_string(&body).unwrap_or_default()
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    #[tracing::instrument(skip_all, fields(url = %sanitize_url(url), status = %event.status))]
    async fn notify(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        let body = webhook_body(event);

        let mut request = self
            .client
            .post(url)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(secret) = &self.secret {
            let signature = sign_payload(secret.as_bytes(), body.as_bytes())?;
            request = request.header(SIGNATURE_HEADER, signature);
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| WebhookError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            tracing::debug!(code = response.status().as_u16(), "Webhook target rejected event");
            return Err(WebhookError::Rejected(response.status().as_u16()));
        }

        tracing::debug!("Webhook posted");
        Ok(())
    }
}
