//! Distribution backend implementations
//!
//! - `inmemory`: single-process backend (atomic ids, in-memory log, channel pub/sub)

pub mod inmemory;

pub use inmemory::InMemoryBackend;
