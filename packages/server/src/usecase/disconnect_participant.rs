//! UseCase: 参加者切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, ParticipantName};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectParticipantUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 参加者切断を実行
    ///
    /// 名前がまだこの接続のものである場合にだけ Registry から削除する。
    /// 同名の新しい接続に置き換えられていた場合は何もしない。
    ///
    /// # Returns
    ///
    /// Registry から削除したかどうか
    pub async fn execute(&self, name: &ParticipantName, connection_id: ConnectionId) -> bool {
        let released = self.registry.release(name, connection_id).await;
        if released {
            tracing::info!("{} left the chat", name);
        } else {
            tracing::debug!(
                "Connection {} for '{}' was already unregistered",
                connection_id,
                name
            );
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{domain::Connection, infrastructure::registry::InMemoryConnectionRegistry};

    #[tokio::test]
    async fn test_disconnect_removes_participant() {
        // テスト項目: 切断した参加者が Registry から削除される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectParticipantUseCase::new(registry.clone());
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = Connection::new(ParticipantName::new("bob").unwrap(), Utc::now(), tx);
        let (name, id) = (connection.name.clone(), connection.id);
        registry.register(connection).await;

        // when (操作):
        let released = usecase.execute(&name, id).await;

        // then (期待する結果):
        assert!(released);
        assert!(!registry.contains(&name).await);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 既に削除済みの参加者の切断は何もしない（冪等性）
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = DisconnectParticipantUseCase::new(registry.clone());
        let name = ParticipantName::new("ghost").unwrap();

        // when (操作):
        let first = usecase.execute(&name, ConnectionId::generate()).await;
        let second = usecase.execute(&name, ConnectionId::generate()).await;

        // then (期待する結果):
        assert!(!first);
        assert!(!second);
    }
}
