use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::WebhookNotifier;
use crate::domain::WebhookEvent;

pub struct WebhookDelivery {
    pub url: String,
    pub event: WebhookEvent,
}

/// Hands webhook events to the delivery worker without waiting on it.
#[derive(Clone)]
pub struct WebhookDispatcher {
    sender: mpsc::Sender<WebhookDelivery>,
}

impl WebhookDispatcher {
    pub fn new(sender: mpsc::Sender<WebhookDelivery>) -> Self {
        Self { sender }
    }

    pub fn dispatch(&self, url: &str, event: WebhookEvent) {
        let status = event.status;
        let delivery = WebhookDelivery {
            url: url.to_string(),
            event,
        };

        match self.sender.try_send(delivery) {
            Ok(()) => tracing::debug!(status = %status, "Webhook event queued"),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(status = %status, "Webhook queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(status = %status, "Webhook worker stopped, dropping event");
            }
        }
    }
}

/// Delivers queued webhook events in order. Failures are logged only.
pub struct WebhookWorker {
    receiver: mpsc::Receiver<WebhookDelivery>,
    notifier: Arc<dyn WebhookNotifier>,
}

impl WebhookWorker {
    pub fn new(receiver: mpsc::Receiver<WebhookDelivery>, notifier: Arc<dyn WebhookNotifier>) -> Self {
        Self { receiver, notifier }
    }

    pub async fn run(mut self) {
        tracing::info!("Webhook worker started");
        while let Some(delivery) = self.receiver.recv().await {
            match self.notifier.notify(&delivery.url, &delivery.event).await {
                Ok(()) => tracing::debug!(
                    status = %delivery.event.status,
                    "Webhook delivered"
                ),
                Err(e) => tracing::warn!(
                    status = %delivery.event.status,
                    error = %e,
                    "Webhook delivery failed"
                ),
            }
        }
        tracing::info!("Webhook worker stopped: channel closed");
    }
}

pub fn webhook_channel(
    capacity: usize,
    notifier: Arc<dyn WebhookNotifier>,
) -> (WebhookDispatcher, WebhookWorker) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        WebhookDispatcher::new(sender),
        WebhookWorker::new(receiver, notifier),
    )
}
