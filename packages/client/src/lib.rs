//! Terminal client for the rtchat relay server.
//!
//! Sends a display name on connect, then one JSON envelope per input line, and
//! prints every envelope the server relays back.

pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
