//! Server state shared by every connection task.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
    GetParticipantsUseCase, RelayMessageUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（ハンドシェイク後の登録）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断時の登録解除）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（採番・追記・publish）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// RelayMessageUseCase（publish されたメッセージの中継）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// GetParticipantsUseCase（管理 API）
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
    /// GetHistoryUseCase（管理 API）
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    /// Longest accepted inbound line, in bytes
    pub max_line_length: usize,
}
