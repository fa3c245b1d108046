//! Notification sinks (push transports)

use async_trait::async_trait;
use shared::message::ChangeEvent;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint rejected event with status {0}")]
    Rejected(u16),
}

/// Push transport for committed change events
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, event: &ChangeEvent) -> Result<(), SinkError>;
}

/// Writes every event to the log
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, event: &ChangeEvent) -> Result<(), SinkError> {
        tracing::info!(
            event_type = %event.event_type,
            restaurant_id = event.restaurant_id,
            resource_id = %event.resource_id,
            "Change event"
        );
        Ok(())
    }
}

/// POSTs each event as JSON to a webhook endpoint
pub struct WebhookSink {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: format!("webhook:{url}"),
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, event: &ChangeEvent) -> Result<(), SinkError> {
        let resp = self.client.post(&self.url).json(event).send().await?;
        if !resp.status().is_success() {
            return Err(SinkError::Rejected(resp.status().as_u16()));
        }
        Ok(())
    }
}
