//! UseCase: 配信されたメッセージを接続中の全クライアントへ中継する

use std::sync::Arc;

use rtchat_shared::message::{Message, encode_batch};

use crate::domain::{BackendError, ConnectionRegistry, DistributionBackend, Subscription};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    backend: Arc<dyn DistributionBackend>,
    registry: Arc<dyn ConnectionRegistry>,
    channel: String,
}

impl RelayMessageUseCase {
    pub fn new(
        backend: Arc<dyn DistributionBackend>,
        registry: Arc<dyn ConnectionRegistry>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            registry,
            channel: channel.into(),
        }
    }

    /// Subscribe to the channel new envelopes are published on.
    pub async fn subscribe(&self) -> Result<Subscription, BackendError> {
        self.backend.subscribe(&self.channel).await
    }

    /// Relay one published payload to every registered connection.
    ///
    /// The envelope is re-encoded as a one-element batch, the framing clients
    /// decode. Returns the number of connections it was handed to.
    pub async fn execute(&self, payload: &str) -> Result<usize, RelayError> {
        let message: Message =
            serde_json::from_str(payload).map_err(|e| RelayError::Decode(e.to_string()))?;
        let line = encode_batch(std::slice::from_ref(&message))
            .map_err(|e| RelayError::Encode(e.to_string()))?;

        Ok(self.registry.broadcast(&line).await)
    }
}
