mod http_webhook_notifier;
mod signature;

pub use http_webhook_notifier::{DEFAULT_WEBHOOK_TIMEOUT, HttpWebhookNotifier, webhook_body};
pub use signature::{SIGNATURE_HEADER, sign_payload, verify_signature};
