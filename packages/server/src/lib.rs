//! Broadcast chat relay server.
//!
//! Clients connect over TCP, announce a display name on the first line, then
//! send one JSON envelope per line. Every envelope is numbered, appended to a
//! log, and published on a pub/sub channel. A single relay task subscribed to
//! that channel fans each envelope out to every connected client.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod app;
pub mod config;
