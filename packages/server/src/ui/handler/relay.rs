//! Egress relay task.
//!
//! The single subscriber that bridges the backend's publish channel to every
//! locally connected client.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{domain::Subscription, usecase::RelayMessageUseCase};

/// Relay published envelopes until shutdown or until the subscription closes.
///
/// A payload that fails to decode or encode is logged and skipped.
pub async fn relay_loop(
    usecase: Arc<RelayMessageUseCase>,
    mut subscription: Subscription,
    shutdown: CancellationToken,
) {
    tracing::info!("Egress relay subscribed to '{}'", subscription.channel());

    loop {
        let payload = tokio::select! {
            _ = shutdown.cancelled() => break,
            payload = subscription.recv() => payload,
        };

        match payload {
            Ok(payload) => match usecase.execute(&payload).await {
                Ok(delivered) => {
                    tracing::debug!("Relayed message to {} connections", delivered);
                }
                Err(e) => {
                    tracing::warn!("Skipping published payload: {}", e);
                }
            },
            Err(e) => {
                tracing::error!("Egress relay lost its subscription: {}", e);
                break;
            }
        }
    }

    tracing::info!("Egress relay stopped");
}
