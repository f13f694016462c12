//! Error types for the server supervisor.

use std::io;

use thiserror::Error;

use crate::domain::BackendError;

/// Errors that stop the whole server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Listening endpoint could not be opened
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Egress relay could not subscribe to the backend
    #[error("failed to subscribe egress relay: {0}")]
    Subscribe(#[from] BackendError),

    /// I/O error on a listener after startup
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
