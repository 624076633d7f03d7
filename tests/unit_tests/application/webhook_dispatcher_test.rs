use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use verbatim::application::ports::{WebhookError, WebhookNotifier};
use verbatim::application::services::webhook_channel;
use verbatim::domain::{WebhookEvent, WebhookStatus};

#[derive(Default)]
struct RecordingNotifier {
    delivered: Mutex<Vec<(String, WebhookStatus)>>,
    reject_first: bool,
}

#[async_trait]
impl WebhookNotifier for RecordingNotifier {
    async fn notify(&self, url: &str, event: &WebhookEvent) -> Result<(), WebhookError> {
        let mut delivered = self.delivered.lock().unwrap();
        delivered.push((url.to_string(), event.status));
        if self.reject_first && delivered.len() == 1 {
            return Err(WebhookError::Rejected(503));
        }
        Ok(())
    }
}

#[tokio::test]
async fn given_dispatched_events_when_worker_drains_then_they_arrive_in_order() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (dispatcher, worker) = webhook_channel(8, notifier.clone());

    let rid = Some("rec-1".to_string());
    dispatcher.dispatch("https://a.example.com", WebhookEvent::transcribing(rid.clone()));
    dispatcher.dispatch(
        "https://a.example.com",
        WebhookEvent::transcribed(rid, "hi".to_string()),
    );
    drop(dispatcher);

    worker.run().await;

    let delivered = notifier.delivered.lock().unwrap().clone();
    assert_eq!(
        delivered,
        vec![
            ("https://a.example.com".to_string(), WebhookStatus::Transcribing),
            ("https://a.example.com".to_string(), WebhookStatus::Transcribed),
        ]
    );
}

#[tokio::test]
async fn given_rejected_delivery_when_worker_runs_then_later_events_are_still_sent() {
    let notifier = Arc::new(RecordingNotifier {
        reject_first: true,
        ..Default::default()
    });
    let (dispatcher, worker) = webhook_channel(8, notifier.clone());

    dispatcher.dispatch("https://a.example.com", WebhookEvent::transcribing(None));
    dispatcher.dispatch(
        "https://a.example.com",
        WebhookEvent::failed(None, "boom".to_string()),
    );
    drop(dispatcher);

    worker.run().await;

    assert_eq!(notifier.delivered.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn given_full_queue_when_dispatching_then_event_is_dropped_without_blocking() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (dispatcher, worker) = webhook_channel(1, notifier.clone());

    dispatcher.dispatch("https://a.example.com", WebhookEvent::transcribing(None));
    dispatcher.dispatch("https://a.example.com", WebhookEvent::transcribing(None));
    drop(dispatcher);

    worker.run().await;

    assert_eq!(notifier.delivered.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn given_stopped_worker_when_dispatching_then_does_not_panic() {
    let notifier = Arc::new(RecordingNotifier::default());
    let (dispatcher, worker) = webhook_channel(4, notifier);
    drop(worker);

    dispatcher.dispatch("https://a.example.com", WebhookEvent::transcribing(None));
}
