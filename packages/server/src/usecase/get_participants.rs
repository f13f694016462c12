//! UseCase: 接続中の参加者一覧を取得する

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, ParticipantSnapshot};

/// 参加者一覧取得のユースケース
pub struct GetParticipantsUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetParticipantsUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 名前順の参加者一覧
    pub async fn execute(&self) -> Vec<ParticipantSnapshot> {
        self.registry.participants().await
    }
}
