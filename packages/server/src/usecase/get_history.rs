//! UseCase: メッセージログの末尾を取得する

use std::sync::Arc;

use rtchat_shared::message::Message;

use crate::domain::{BackendError, DistributionBackend};

/// Default number of entries returned when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// メッセージ履歴取得のユースケース
pub struct GetHistoryUseCase {
    backend: Arc<dyn DistributionBackend>,
    messages_key: String,
}

impl GetHistoryUseCase {
    pub fn new(backend: Arc<dyn DistributionBackend>, messages_key: impl Into<String>) -> Self {
        Self {
            backend,
            messages_key: messages_key.into(),
        }
    }

    /// Read the last `limit` messages, oldest first.
    ///
    /// Entries that no longer decode are skipped.
    pub async fn execute(&self, limit: usize) -> Result<Vec<Message>, BackendError> {
        let entries = self.backend.recent(&self.messages_key, limit).await?;
        Ok(entries
            .iter()
            .filter_map(|entry| match serde_json::from_str::<Message>(entry) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!("Skipping undecodable log entry: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::backend::InMemoryBackend;

    #[tokio::test]
    async fn test_history_returns_tail_and_skips_garbage() {
        // テスト項目: ログ末尾が古い順に返され、壊れたエントリは除外される
        // given (前提条件):
        let backend = Arc::new(InMemoryBackend::new());
        backend.append("messages", r#"{"id":1,"content":"one"}"#).await.unwrap();
        backend.append("messages", "garbage").await.unwrap();
        backend.append("messages", r#"{"id":3,"content":"three"}"#).await.unwrap();
        let usecase = GetHistoryUseCase::new(backend, "messages");

        // when (操作):
        let all = usecase.execute(10).await.unwrap();
        let last = usecase.execute(1).await.unwrap();

        // then (期待する結果):
        assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].content, "three");
    }
}
