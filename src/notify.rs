use crate::error::NotificationError;
use std::time::Duration;

/// Posts plain-text messages to a Slack-compatible incoming webhook
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// `timeout` bounds each webhook request
    pub fn new(webhook_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            webhook_url: webhook_url.to_string(),
        }
    }

    /// Sends `{"text": message}` to the webhook
    pub async fn send(&self, message: &str) -> Result<(), NotificationError> {
        let body = serde_json::json!({ "text": message });

        let resp = self.client.post(&self.webhook_url).json(&body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

/// Delivers `message` if a notifier is configured. Failures are logged and swallowed.
pub async fn deliver(notifier: Option<&SlackNotifier>, message: &str) {
    let Some(notifier) = notifier else {
        ::log::debug!("No webhook configured, skipping notification");
        return;
    };

    match notifier.send(message).await {
        Ok(()) => ::log::info!("Notification delivered"),
        Err(e) => ::log::error!("Failed to deliver notification: {}", e),
    }
}
