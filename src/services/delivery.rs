//! Alert delivery channels.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use crate::alerts::composer::AlertPayload;
use crate::error::{EngineError, Result};

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Channel name used in logs and delivery errors.
    fn name(&self) -> &str;

    async fn deliver(&self, payload: &AlertPayload) -> Result<()>;
}

/// Writes the rendered alert to the log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, payload: &AlertPayload) -> Result<()> {
        info!(
            symbol = %payload.symbol,
            direction = %payload.direction,
            strength = payload.strength,
            "\n{}",
            payload.render()
        );
        Ok(())
    }
}

/// Forwards payloads to an in-process consumer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    name: String,
    sender: mpsc::Sender<AlertPayload>,
}

impl ChannelSink {
    pub fn new(name: impl Into<String>, sender: mpsc::Sender<AlertPayload>) -> Self {
        Self {
            name: name.into(),
            sender,
        }
    }
}

#[async_trait]
impl AlertSink for ChannelSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn deliver(&self, payload: &AlertPayload) -> Result<()> {
        self.sender
            .send(payload.clone())
            .await
            .map_err(|e| EngineError::Delivery {
                channel: self.name.clone(),
                reason: e.to_string(),
            })
    }
}
