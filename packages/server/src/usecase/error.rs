//! UseCase error types.

use thiserror::Error;

use crate::domain::BackendError;

/// Handshake registration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Name is already held by another connection
    #[error("name '{0}' is already connected")]
    DuplicateName(String),
}

/// Ingress append-and-publish errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to encode message: {0}")]
    Encode(String),
}

/// Per-payload egress relay errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("failed to decode published payload: {0}")]
    Decode(String),

    #[error("failed to encode batch: {0}")]
    Encode(String),
}
