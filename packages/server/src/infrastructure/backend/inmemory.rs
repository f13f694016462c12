//! InMemory Distribution Backend 実装
//!
//! ドメイン層が定義する DistributionBackend trait の具体的な実装。
//! 単一プロセス内で ID 採番・メッセージログ・pub/sub を提供します。
//!
//! ## 技術的負債
//!
//! ログはプロセス終了とともに失われます。複数サーバーインスタンスで共有するには
//! 外部の pub/sub + list ストレージを使う実装が必要です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{BackendError, DistributionBackend, PusherChannel, Subscription};

/// インメモリ Distribution Backend 実装
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    /// Key: id key, Value: last issued id
    counters: Mutex<HashMap<String, i64>>,
    /// Key: log key, Value: serialized envelopes in append order
    logs: Mutex<HashMap<String, Vec<String>>>,
    /// Key: channel, Value: live subscribers
    subscribers: Mutex<HashMap<String, Vec<PusherChannel>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the log at `key`
    pub async fn log_len(&self, key: &str) -> usize {
        self.logs.lock().await.get(key).map_or(0, Vec::len)
    }

    /// Number of live subscribers on `channel`
    pub async fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .lock()
            .await
            .get(channel)
            .map_or(0, |subs| subs.iter().filter(|s| !s.is_closed()).count())
    }
}

#[async_trait]
impl DistributionBackend for InMemoryBackend {
    async fn next_id(&self, key: &str) -> Result<i64, BackendError> {
        let mut counters = self.counters.lock().await;
        let counter = counters.entry(key.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn append(&self, key: &str, payload: &str) -> Result<(), BackendError> {
        self.logs
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .push(payload.to_string());
        Ok(())
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<(), BackendError> {
        let mut subscribers = self.subscribers.lock().await;
        if let Some(subs) = subscribers.get_mut(channel) {
            // 受信側が閉じた購読者は配信時に取り除く
            subs.retain(|sub| sub.send(payload.to_string()).is_ok());
            tracing::debug!("Published to {} subscribers of '{}'", subs.len(), channel);
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<Subscription, BackendError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .await
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        tracing::debug!("New subscriber on '{}'", channel);
        Ok(Subscription::new(channel, rx))
    }

    async fn recent(&self, key: &str, count: usize) -> Result<Vec<String>, BackendError> {
        let logs = self.logs.lock().await;
        let entries = logs.get(key).map(Vec::as_slice).unwrap_or_default();
        let start = entries.len().saturating_sub(count);
        Ok(entries[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;

    #[tokio::test]
    async fn test_next_id_is_strictly_increasing() {
        // テスト項目: next_id が 1 から単調増加する
        // given (前提条件):
        let backend = InMemoryBackend::new();

        // when (操作):
        let ids = [
            backend.next_id("id").await.unwrap(),
            backend.next_id("id").await.unwrap(),
            backend.next_id("id").await.unwrap(),
        ];

        // then (期待する結果):
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn test_next_id_never_duplicates_under_concurrency() {
        // テスト項目: 並行して採番しても ID が重複しない
        // given (前提条件):
        let backend = Arc::new(InMemoryBackend::new());

        // when (操作):
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let backend = backend.clone();
                tokio::spawn(async move {
                    let mut ids = Vec::new();
                    for _ in 0..50 {
                        ids.push(backend.next_id("id").await.unwrap());
                    }
                    ids
                })
            })
            .collect();
        let mut all = Vec::new();
        for task in tasks {
            let ids = task.await.unwrap();
            // then (期待する結果): 各タスク内では増加順
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            all.extend(ids);
        }

        // then (期待する結果):
        let unique: HashSet<i64> = all.iter().copied().collect();
        assert_eq!(unique.len(), 800);
        assert_eq!(all.iter().max(), Some(&800));
    }

    #[tokio::test]
    async fn test_publish_reaches_current_subscribers_only() {
        // テスト項目: publish は購読中の購読者にのみ届く
        // given (前提条件):
        let backend = InMemoryBackend::new();
        let mut early = backend.subscribe("message").await.unwrap();
        backend.publish("message", "first").await.unwrap();

        // when (操作):
        let mut late = backend.subscribe("message").await.unwrap();
        backend.publish("message", "second").await.unwrap();

        // then (期待する結果):
        assert_eq!(early.recv().await.unwrap(), "first");
        assert_eq!(early.recv().await.unwrap(), "second");
        assert_eq!(late.recv().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_publish_prunes_dropped_subscribers() {
        // テスト項目: 破棄された購読者は publish 時に取り除かれる
        // given (前提条件):
        let backend = InMemoryBackend::new();
        let kept = backend.subscribe("message").await.unwrap();
        let dropped = backend.subscribe("message").await.unwrap();
        drop(dropped);

        // when (操作):
        backend.publish("message", "payload").await.unwrap();

        // then (期待する結果):
        let stored = backend.subscribers.lock().await["message"].len();
        assert_eq!(stored, 1);
        assert_eq!(backend.subscriber_count("message").await, 1);
        drop(kept);
    }

    #[tokio::test]
    async fn test_recent_returns_tail_in_append_order() {
        // テスト項目: recent がログの末尾を追記順で返す
        // given (前提条件):
        let backend = InMemoryBackend::new();
        for payload in ["a", "b", "c", "d"] {
            backend.append("messages", payload).await.unwrap();
        }

        // when (操作):
        let tail = backend.recent("messages", 2).await.unwrap();
        let all = backend.recent("messages", 10).await.unwrap();
        let missing = backend.recent("other", 10).await.unwrap();

        // then (期待する結果):
        assert_eq!(tail, vec!["c", "d"]);
        assert_eq!(all, vec!["a", "b", "c", "d"]);
        assert!(missing.is_empty());
        assert_eq!(backend.log_len("messages").await, 4);
    }
}
