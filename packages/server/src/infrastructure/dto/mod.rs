//! Data Transfer Objects (DTOs) for the relay server.
//!
//! DTOs are organized by protocol:
//! - `tcp`: inbound line protocol DTOs
//! - `http`: admin HTTP API response DTOs

pub mod http;
pub mod tcp;
