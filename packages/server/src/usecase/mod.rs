//! UseCase layer: the relay's operations, written against domain traits only.

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_history;
mod get_participants;
mod relay_message;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, RelayError, SendMessageError};
pub use get_history::{DEFAULT_HISTORY_LIMIT, GetHistoryUseCase};
pub use get_participants::GetParticipantsUseCase;
pub use relay_message::RelayMessageUseCase;
pub use send_message::SendMessageUseCase;
