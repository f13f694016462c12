//! Shared library for the rtchat relay server and client.
//!
//! Holds the message envelope wire format, the clock abstraction, and logger setup.

pub mod logger;
pub mod message;
pub mod time;
