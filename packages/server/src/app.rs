//! Composition root: wires the registry, backend, and clock into a [`Server`].

use std::sync::Arc;

use rtchat_shared::time::Clock;

use crate::{
    config::ServerConfig,
    domain::{ConnectionRegistry, DistributionBackend},
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
        GetParticipantsUseCase, RelayMessageUseCase, SendMessageUseCase,
    },
};

/// Build a server over the given registry, backend, and clock.
pub fn build_server(
    config: ServerConfig,
    registry: Arc<dyn ConnectionRegistry>,
    backend: Arc<dyn DistributionBackend>,
    clock: Arc<dyn Clock>,
) -> Server {
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        clock.clone(),
        config.duplicate_names,
    ));
    let disconnect_participant_usecase =
        Arc::new(DisconnectParticipantUseCase::new(registry.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        backend.clone(),
        clock,
        config.keys.clone(),
    ));
    let relay_message_usecase = Arc::new(RelayMessageUseCase::new(
        backend.clone(),
        registry.clone(),
        config.keys.channel.clone(),
    ));
    let get_participants_usecase = Arc::new(GetParticipantsUseCase::new(registry));
    let get_history_usecase = Arc::new(GetHistoryUseCase::new(
        backend,
        config.keys.messages_key.clone(),
    ));

    Server::new(
        config,
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        relay_message_usecase,
        get_participants_usecase,
        get_history_usecase,
    )
}
