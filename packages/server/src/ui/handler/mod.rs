//! Connection, relay, and admin HTTP handlers.

pub mod connection;
pub mod http;
pub mod relay;
