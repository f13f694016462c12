//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Handshake name is empty after trimming
    #[error("participant name must not be empty")]
    EmptyName,
}

/// Distribution backend failures
///
/// Terminal for the operation that triggered them; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Backend could not be reached or refused the operation
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// Subscription channel closed by the backend
    #[error("subscription to '{0}' closed")]
    SubscriptionClosed(String),
}
