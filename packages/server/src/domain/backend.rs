//! Distribution Backend trait 定義
//!
//! メッセージログへの追記と pub/sub 配信を担う外部サービスのインターフェース。
//! ドメイン層はこの trait にのみ依存し、具体的なストレージ製品には依存しない。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::BackendError;

/// Ordered, blocking-receive stream of payloads published on one channel.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    receiver: mpsc::UnboundedReceiver<String>,
}

impl Subscription {
    pub fn new(channel: impl Into<String>, receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            channel: channel.into(),
            receiver,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for the next published payload.
    pub async fn recv(&mut self) -> Result<String, BackendError> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| BackendError::SubscriptionClosed(self.channel.clone()))
    }
}

/// Distribution Backend trait
///
/// Append and publish are separate operations: a record can persist while its
/// publish notification is lost.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistributionBackend: Send + Sync {
    /// Atomically return a fresh id, strictly greater than every id returned before.
    async fn next_id(&self, key: &str) -> Result<i64, BackendError>;

    /// Durably append a serialized envelope to the ordered log at `key`.
    async fn append(&self, key: &str, payload: &str) -> Result<(), BackendError>;

    /// Deliver a serialized envelope to the current subscribers of `channel`.
    ///
    /// Subscribers that join later do not see it.
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), BackendError>;

    async fn subscribe(&self, channel: &str) -> Result<Subscription, BackendError>;

    /// Read up to `count` of the most recent entries of the log at `key`, oldest first.
    async fn recent(&self, key: &str, count: usize) -> Result<Vec<String>, BackendError>;
}
