//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - ハンドシェイクで名乗った名前での Registry への登録
//!
//! ### なぜこのテストが必要か
//! - 同名接続の扱い（拒否 / 置き換え）が設定どおりに動くことを保証
//! - 拒否した場合に既存の接続が影響を受けないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい名前での接続
//! - 異常系：Reject ポリシーでの同名接続
//! - エッジケース：Replace ポリシーでの同名接続

use std::sync::Arc;

use rtchat_shared::time::Clock;

use crate::{
    config::DuplicateNamePolicy,
    domain::{Connection, ConnectionRegistry, ParticipantName, ParticipantSnapshot, PusherChannel},
};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Registry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
    policy: DuplicateNamePolicy,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        clock: Arc<dyn Clock>,
        policy: DuplicateNamePolicy,
    ) -> Self {
        Self {
            registry,
            clock,
            policy,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `name` - ハンドシェイクで受け取った参加者名
    /// * `channel` - この接続の writer タスクへの送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantSnapshot)` - 登録された接続（切断時の release に ID を使う）
    /// * `Err(ConnectError)` - Reject ポリシーで名前が使用中
    pub async fn execute(
        &self,
        name: ParticipantName,
        channel: PusherChannel,
    ) -> Result<ParticipantSnapshot, ConnectError> {
        let connection = Connection::new(name, self.clock.now(), channel);
        let snapshot = connection.snapshot();

        match self.policy {
            DuplicateNamePolicy::Reject => {
                if !self.registry.register_if_absent(connection).await {
                    return Err(ConnectError::DuplicateName(snapshot.name.into_string()));
                }
            }
            DuplicateNamePolicy::Replace => {
                if let Some(previous) = self.registry.register(connection).await {
                    tracing::warn!(
                        "'{}' reconnected; connection {} is no longer reachable by broadcast",
                        snapshot.name,
                        previous.id
                    );
                }
            }
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use rtchat_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::infrastructure::registry::InMemoryConnectionRegistry;

    fn create_usecase(
        policy: DuplicateNamePolicy,
    ) -> (ConnectParticipantUseCase, Arc<InMemoryConnectionRegistry>) {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let clock = Arc::new(FixedClock::from_millis(1_000));
        let usecase = ConnectParticipantUseCase::new(registry.clone(), clock, policy);
        (usecase, registry)
    }

    #[tokio::test]
    async fn test_connect_new_participant() {
        // テスト項目: 新しい名前の参加者が登録され、接続時刻が記録される
        // given (前提条件):
        let (usecase, registry) = create_usecase(DuplicateNamePolicy::Reject);
        let (tx, _rx) = mpsc::unbounded_channel();
        let alice = ParticipantName::new("alice").unwrap();

        // when (操作):
        let result = usecase.execute(alice.clone(), tx).await;

        // then (期待する結果):
        let snapshot = result.unwrap();
        assert_eq!(snapshot.name, alice);
        assert_eq!(snapshot.connected_at.timestamp_millis(), 1_000);
        assert!(registry.contains(&alice).await);
    }

    #[tokio::test]
    async fn test_connect_duplicate_name_rejected() {
        // テスト項目: Reject ポリシーでは同名接続が拒否され、既存の接続は残る
        // given (前提条件):
        let (usecase, registry) = create_usecase(DuplicateNamePolicy::Reject);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let carol = ParticipantName::new("carol").unwrap();
        let first = usecase.execute(carol.clone(), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(carol.clone(), tx2).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::DuplicateName("carol".to_string())));
        let participants = registry.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].id, first.id);
    }

    #[tokio::test]
    async fn test_connect_duplicate_name_replaced() {
        // テスト項目: Replace ポリシーでは後の接続が前の接続を置き換える
        // given (前提条件):
        let (usecase, registry) = create_usecase(DuplicateNamePolicy::Replace);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let carol = ParticipantName::new("carol").unwrap();
        usecase.execute(carol.clone(), tx1).await.unwrap();

        // when (操作):
        let second = usecase.execute(carol.clone(), tx2).await.unwrap();

        // then (期待する結果):
        let participants = registry.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].id, second.id);
        registry.broadcast("hello").await;
        assert_eq!(rx2.recv().await, Some("hello".to_string()));
    }
}
