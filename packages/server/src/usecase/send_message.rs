//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ID 採番・日時付与・ログ追記・publish の一連の処理
//!
//! ### なぜこのテストが必要か
//! - id と date はサーバーが必ず上書きすることを保証
//! - バックエンドの失敗がその操作で止まる（publish されない）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：追記と publish が行われる
//! - エッジケース：メッセージに名前がない場合はハンドシェイクの名前を使う
//! - 異常系：採番 / 追記の失敗

use std::sync::Arc;

use rtchat_shared::{message::Message, time::Clock};

use crate::{
    config::BackendKeys,
    domain::{DistributionBackend, ParticipantName},
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// DistributionBackend（ログと pub/sub の抽象化）
    backend: Arc<dyn DistributionBackend>,
    clock: Arc<dyn Clock>,
    keys: BackendKeys,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        backend: Arc<dyn DistributionBackend>,
        clock: Arc<dyn Clock>,
        keys: BackendKeys,
    ) -> Self {
        Self {
            backend,
            clock,
            keys,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - ハンドシェイクで登録された参加者名
    /// * `draft` - クライアントから受け取ったメッセージ（id と date は上書きされる）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 追記・publish されたメッセージ
    /// * `Err(SendMessageError)` - 採番・エンコード・追記・publish のいずれかが失敗
    pub async fn execute(
        &self,
        sender: &ParticipantName,
        mut draft: Message,
    ) -> Result<Message, SendMessageError> {
        if draft.name.trim().is_empty() {
            draft.name = sender.as_str().to_string();
        }

        // 1. サーバー側で id と date を付与
        draft.id = self.backend.next_id(&self.keys.id_key).await?;
        draft.date = self.clock.now();

        let payload =
            serde_json::to_string(&draft).map_err(|e| SendMessageError::Encode(e.to_string()))?;

        // 2. ログに追記してから publish
        self.backend
            .append(&self.keys.messages_key, &payload)
            .await?;
        self.backend.publish(&self.keys.channel, &payload).await?;

        tracing::debug!("Message {} from '{}' published", draft.id, draft.name);
        Ok(draft)
    }
}
