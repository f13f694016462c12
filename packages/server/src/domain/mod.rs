//! Domain layer: value objects, errors, and the interfaces the relay depends on.

pub mod backend;
pub mod error;
pub mod registry;
pub mod value_object;

pub use backend::{DistributionBackend, Subscription};
pub use error::{BackendError, ValueObjectError};
pub use registry::{Connection, ConnectionRegistry, ParticipantSnapshot, PusherChannel};
pub use value_object::{ConnectionId, ParticipantName};

#[cfg(test)]
pub use backend::MockDistributionBackend;
