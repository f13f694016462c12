//! Server supervisor.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
        GetParticipantsUseCase, RelayMessageUseCase, SendMessageUseCase,
    },
};

use super::{
    error::ServerError,
    handler::{
        connection::handle_connection,
        http::{get_messages, get_participants, health_check},
        relay::relay_loop,
    },
    state::AppState,
};

/// TCP chat relay server
///
/// Owns the listening socket and the shared state. Spawns exactly one egress
/// relay and one task per accepted connection.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, connect, disconnect, send, relay, participants, history);
/// server.run(CancellationToken::new()).await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind addresses and limits
    /// * `connect_participant_usecase` - UseCase for handshake registration
    /// * `disconnect_participant_usecase` - UseCase for teardown
    /// * `send_message_usecase` - UseCase for ingress append-and-publish
    /// * `relay_message_usecase` - UseCase for egress fan-out
    /// * `get_participants_usecase` - UseCase for the admin participant list
    /// * `get_history_usecase` - UseCase for the admin message history
    pub fn new(
        config: ServerConfig,
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        relay_message_usecase: Arc<RelayMessageUseCase>,
        get_participants_usecase: Arc<GetParticipantsUseCase>,
        get_history_usecase: Arc<GetHistoryUseCase>,
    ) -> Self {
        let state = Arc::new(AppState {
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            relay_message_usecase,
            get_participants_usecase,
            get_history_usecase,
            max_line_length: config.max_line_length,
        });
        Self { config, state }
    }

    /// Bind the configured addresses and serve until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if a listener cannot be bound or the egress relay
    /// cannot subscribe.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let listener = bind(&self.config.bind_address()).await?;
        let admin_listener = match self.config.admin_bind_address() {
            Some(address) => Some(bind(&address).await?),
            None => None,
        };
        self.serve(listener, admin_listener, shutdown).await
    }

    /// Serve on already-bound listeners until `shutdown` is cancelled.
    pub async fn serve(
        self,
        listener: TcpListener,
        admin_listener: Option<TcpListener>,
        shutdown: CancellationToken,
    ) -> Result<(), ServerError> {
        // Subscribe before accepting so no publish can precede the relay.
        let subscription = self.state.relay_message_usecase.subscribe().await?;
        let relay_task = tokio::spawn(relay_loop(
            self.state.relay_message_usecase.clone(),
            subscription,
            shutdown.clone(),
        ));

        let admin_task = match admin_listener {
            Some(admin_listener) => Some(spawn_admin(
                admin_listener,
                self.state.clone(),
                shutdown.clone(),
            )?),
            None => None,
        };

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        tracing::debug!("Accepted connection from {}", peer);
                        tokio::spawn(handle_connection(
                            stream,
                            peer,
                            self.state.clone(),
                            shutdown.child_token(),
                        ));
                    }
                    Err(e) => {
                        tracing::warn!("Accept error: {}", e);
                    }
                },
            }
        }

        if let Err(e) = relay_task.await {
            tracing::warn!("Egress relay task failed: {}", e);
        }
        if let Some(admin_task) = admin_task {
            match admin_task.await {
                Ok(Err(e)) => tracing::warn!("Admin API stopped with error: {}", e),
                Err(e) => tracing::warn!("Admin API task failed: {}", e),
                Ok(Ok(())) => {}
            }
        }

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

async fn bind(address: &str) -> Result<TcpListener, ServerError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.to_string(),
            source,
        })
}

/// Build the admin HTTP router
pub fn admin_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/participants", get(get_participants))
        .route("/api/messages", get(get_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn spawn_admin(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
) -> Result<JoinHandle<std::io::Result<()>>, ServerError> {
    tracing::info!("Admin API listening on http://{}", listener.local_addr()?);
    let app = admin_router(state);
    Ok(tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
    }))
}
