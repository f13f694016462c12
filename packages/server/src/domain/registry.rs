//! Connection Registry trait 定義
//!
//! 接続中の参加者名と、その接続への送信チャンネルの対応を管理するインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{ConnectionId, ParticipantName};

/// Outbound channel feeding one connection's writer task.
///
/// Each item is a complete line without its trailing newline.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// A registered connection.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub name: ParticipantName,
    pub connected_at: DateTime<Utc>,
    pub channel: PusherChannel,
}

impl Connection {
    pub fn new(name: ParticipantName, connected_at: DateTime<Utc>, channel: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            name,
            connected_at,
            channel,
        }
    }

    /// Read-only view without the channel.
    pub fn snapshot(&self) -> ParticipantSnapshot {
        ParticipantSnapshot {
            id: self.id,
            name: self.name.clone(),
            connected_at: self.connected_at,
        }
    }
}

/// Registry entry as seen by readers that must not write to the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSnapshot {
    pub id: ConnectionId,
    pub name: ParticipantName,
    pub connected_at: DateTime<Utc>,
}

/// Connection Registry trait
///
/// Registration and removal take an exclusive lock; broadcast and listing take
/// a shared lock. Implementations must never acquire the exclusive lock while
/// holding the shared one.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Store the connection under its name, returning any entry it replaced.
    ///
    /// The replaced connection is not closed.
    async fn register(&self, connection: Connection) -> Option<Connection>;

    /// Store the connection only if no entry exists under its name.
    ///
    /// Returns `false` and leaves the registry unchanged when the name is taken.
    async fn register_if_absent(&self, connection: Connection) -> bool;

    /// Remove whatever is registered under `name`. Idempotent.
    async fn unregister(&self, name: &ParticipantName) -> Option<Connection>;

    /// Remove the entry under `name` only if it still belongs to `id`.
    async fn release(&self, name: &ParticipantName, id: ConnectionId) -> bool;

    /// Deliver one line to every registered connection.
    ///
    /// A failed delivery is logged and skipped. Returns the number of
    /// connections the line was handed to.
    async fn broadcast(&self, line: &str) -> usize;

    async fn contains(&self, name: &ParticipantName) -> bool;

    async fn participants(&self) -> Vec<ParticipantSnapshot>;
}
