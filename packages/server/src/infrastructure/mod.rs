//! Infrastructure layer: concrete registry and backend implementations, and DTOs.

pub mod backend;
pub mod dto;
pub mod registry;
