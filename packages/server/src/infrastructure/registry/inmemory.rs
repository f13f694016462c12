//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! `RwLock<HashMap>` を使い、登録・削除は排他ロック、ブロードキャストは共有ロックで行います。
//!
//! ## 設計ノート
//!
//! 各接続への書き込みは `PusherChannel` 経由で writer タスクに渡すだけなので、
//! 共有ロックを保持したままソケット I/O で待たされることはありません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRegistry, ParticipantName, ParticipantSnapshot,
};

/// インメモリ Connection Registry 実装
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: participant name, Value: the connection currently holding it
    connections: RwLock<HashMap<ParticipantName, Connection>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection: Connection) -> Option<Connection> {
        let name = connection.name.clone();
        let mut connections = self.connections.write().await;
        let replaced = connections.insert(name.clone(), connection);
        if let Some(previous) = &replaced {
            tracing::warn!(
                "Connection {} replaced connection {} under name '{}'",
                connections[&name].id,
                previous.id,
                name
            );
        } else {
            tracing::debug!("Connection registered under name '{}'", name);
        }
        replaced
    }

    async fn register_if_absent(&self, connection: Connection) -> bool {
        let mut connections = self.connections.write().await;
        if connections.contains_key(&connection.name) {
            tracing::debug!("Name '{}' already registered", connection.name);
            return false;
        }
        tracing::debug!("Connection registered under name '{}'", connection.name);
        connections.insert(connection.name.clone(), connection);
        true
    }

    async fn unregister(&self, name: &ParticipantName) -> Option<Connection> {
        let removed = self.connections.write().await.remove(name);
        if removed.is_some() {
            tracing::debug!("Connection '{}' unregistered", name);
        }
        removed
    }

    async fn release(&self, name: &ParticipantName, id: ConnectionId) -> bool {
        let mut connections = self.connections.write().await;
        match connections.get(name) {
            Some(current) if current.id == id => {
                connections.remove(name);
                tracing::debug!("Connection {} released name '{}'", id, name);
                true
            }
            Some(current) => {
                tracing::debug!(
                    "Connection {} no longer owns name '{}' (held by {}), nothing to release",
                    id,
                    name,
                    current.id
                );
                false
            }
            None => false,
        }
    }

    async fn broadcast(&self, line: &str) -> usize {
        let connections = self.connections.read().await;
        let mut delivered = 0;

        for (name, connection) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = connection.channel.send(line.to_string()) {
                tracing::warn!("Failed to push message to '{}': {}", name, e);
            } else {
                delivered += 1;
            }
        }

        tracing::debug!(
            "Broadcasted line to {}/{} connections",
            delivered,
            connections.len()
        );
        delivered
    }

    async fn contains(&self, name: &ParticipantName) -> bool {
        self.connections.read().await.contains_key(name)
    }

    async fn participants(&self) -> Vec<ParticipantSnapshot> {
        let mut participants: Vec<ParticipantSnapshot> = self
            .connections
            .read()
            .await
            .values()
            .map(Connection::snapshot)
            .collect();
        participants.sort_by(|a, b| a.name.cmp(&b.name));
        participants
    }
}
