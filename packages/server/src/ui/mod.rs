//! UI layer: the TCP supervisor, connection handling, and the admin HTTP API.

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::{Server, admin_router};
pub use signal::shutdown_signal;
