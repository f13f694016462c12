//! Per-connection TCP handler.
//!
//! A connection moves through three states:
//!
//! ```text
//! AWAITING_HANDSHAKE --(name line)--> RELAYING --(EOF / decode error / I/O error)--> CLOSED
//! ```
//!
//! The first line is the participant's display name in raw text. Every line
//! after it is one JSON message envelope. Outbound lines are written by a
//! separate writer task fed through the registry's channel, so a slow peer
//! never holds the registry lock.

use std::{net::SocketAddr, sync::Arc};

use futures_util::{SinkExt, StreamExt};
use rtchat_shared::message::{ErrorFrame, Message};
use tokio::{
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
    task::JoinHandle,
};
use tokio_util::{
    codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError},
    sync::CancellationToken,
};

use crate::{
    domain::{ParticipantName, ParticipantSnapshot},
    infrastructure::dto::tcp::IncomingMessage,
    ui::state::AppState,
};

type LineReader = FramedRead<OwnedReadHalf, LinesCodec>;
type LineWriter = FramedWrite<OwnedWriteHalf, LinesCodec>;

/// Handle one accepted connection until it closes.
///
/// `cancel` is this connection's own scope: a child of the server-wide
/// shutdown token. Closing this connection cancels only `cancel`.
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: Arc<AppState>,
    cancel: CancellationToken,
) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = FramedRead::new(
        read_half,
        LinesCodec::new_with_max_length(state.max_line_length),
    );
    let mut writer = FramedWrite::new(write_half, LinesCodec::new());

    // AWAITING_HANDSHAKE
    let raw_name = match read_handshake(&mut reader, &cancel).await {
        Ok(Some(line)) => line,
        Ok(None) => {
            tracing::debug!("{} closed before handshake", peer);
            return;
        }
        Err(e) => {
            tracing::warn!("Couldn't add connection from {}: {}", peer, e);
            return;
        }
    };

    let name = match ParticipantName::new(&raw_name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting handshake from {}: {}", peer, e);
            reject(&mut writer, e.to_string()).await;
            return;
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let participant = match state
        .connect_participant_usecase
        .execute(name, tx)
        .await
    {
        Ok(participant) => participant,
        Err(e) => {
            tracing::warn!("Rejecting handshake from {}: {}", peer, e);
            reject(&mut writer, e.to_string()).await;
            return;
        }
    };
    tracing::info!(
        "{} has entered the chat (connection {}, {})",
        participant.name,
        participant.id,
        peer
    );

    // RELAYING
    let writer_task = pusher_loop(rx, writer, participant.name.clone(), cancel.clone());
    ingress_loop(&mut reader, &state, &participant, &cancel).await;

    // CLOSED
    state
        .disconnect_participant_usecase
        .execute(&participant.name, participant.id)
        .await;
    cancel.cancel();
    if let Err(e) = writer_task.await {
        tracing::warn!("Writer task for '{}' failed: {}", participant.name, e);
    }
}

/// Read the handshake line.
///
/// Returns `Ok(None)` on end-of-stream or cancellation.
async fn read_handshake(
    reader: &mut LineReader,
    cancel: &CancellationToken,
) -> Result<Option<String>, LinesCodecError> {
    tokio::select! {
        _ = cancel.cancelled() => Ok(None),
        next = reader.next() => next.transpose(),
    }
}

/// Refuse a handshake with one error frame.
async fn reject(writer: &mut LineWriter, reason: String) {
    let frame = match serde_json::to_string(&ErrorFrame::new(reason)) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!("Failed to encode error frame: {}", e);
            return;
        }
    };
    if let Err(e) = writer.send(frame).await {
        tracing::debug!("Failed to send error frame: {}", e);
    }
}

/// Read envelopes from the client and hand each to the distribution backend.
///
/// Returns on end-of-stream, the first undecodable line, an I/O error, a
/// backend failure, or cancellation. None of these are retried.
async fn ingress_loop(
    reader: &mut LineReader,
    state: &AppState,
    participant: &ParticipantSnapshot,
    cancel: &CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Ingress for '{}' cancelled", participant.name);
                return;
            }
            next = reader.next() => next,
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                tracing::warn!(
                    "'{}' sent a line longer than {} bytes, closing",
                    participant.name,
                    state.max_line_length
                );
                return;
            }
            Some(Err(LinesCodecError::Io(e))) => {
                tracing::warn!("Read error from '{}': {}", participant.name, e);
                return;
            }
            None => {
                tracing::debug!("'{}' reached end of stream", participant.name);
                return;
            }
        };

        let incoming = match IncomingMessage::from_line(&line) {
            Ok(incoming) => incoming,
            Err(e) => {
                tracing::warn!("Malformed message from '{}': {}", participant.name, e);
                return;
            }
        };

        let draft = Message::new(incoming.name, incoming.room, incoming.content);
        if let Err(e) = state
            .send_message_usecase
            .execute(&participant.name, draft)
            .await
        {
            tracing::error!("Failed to send message from '{}': {}", participant.name, e);
            return;
        }
    }
}

/// Spawns a task that receives lines from the registry channel and writes them to the socket.
///
/// Ends when the channel closes (the connection was unregistered or replaced),
/// a write fails, or `cancel` fires.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: LineWriter,
    name: ParticipantName,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => break,
                line = rx.recv() => line,
            };
            let Some(line) = line else {
                tracing::debug!("Outbound channel for '{}' closed", name);
                break;
            };
            if let Err(e) = writer.send(line).await {
                tracing::warn!("Failed to write to '{}': {}", name, e);
                break;
            }
        }
        // A dead writer ends the ingress side too.
        cancel.cancel();
    })
}
