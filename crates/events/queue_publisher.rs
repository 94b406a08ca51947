use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use url::Url;

use crate::domain::repositories::events::EventPublisher;
use crate::domain::value_objects::statement_notifications::{
    LockAccountEvent, StatementNotificationInfo,
};

/// Envelope posted to the downstream queue relay.
#[derive(Debug, Serialize)]
pub struct QueueMessage {
    pub source: String,
    pub message_type: String,
    pub payload: serde_json::Value,
}

/// Publishes queue messages over HTTP to the configured relay endpoint.
pub struct QueuePublisher {
    http: reqwest::Client,
    endpoint: Url,
    source: String,
}

impl QueuePublisher {
    pub fn new(endpoint: Url, source: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            source: source.into(),
        }
    }

    async fn post(&self, message_type: &str, payload: serde_json::Value) -> Result<()> {
        let message = QueueMessage {
            source: self.source.clone(),
            message_type: message_type.to_string(),
            payload,
        };

        self.http
            .post(self.endpoint.clone())
            .json(&message)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("failed to publish {message_type} message"))?;

        info!(message_type, "queue message published");
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for QueuePublisher {
    async fn publish_statement_notification(
        &self,
        info: StatementNotificationInfo,
    ) -> Result<()> {
        self.post("statementNotification", serde_json::to_value(&info)?)
            .await
    }

    async fn publish_lock_account(&self, event: LockAccountEvent) -> Result<()> {
        self.post("lockAccount", serde_json::to_value(&event)?).await
    }
}
