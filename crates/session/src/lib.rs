//! Session management
//!
//! Ephemeral per-conversation state keyed by an opaque session identifier,
//! with sliding TTL expiry. The store abstraction is trait-based so tests and
//! single-node development run against an in-memory map while production uses
//! Redis.
//!
//! Updates are read-modify-write with no compare-and-swap: concurrent turns
//! on one session are last-writer-wins. Acceptable under the one-device,
//! one-active-conversation assumption.

pub mod context;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use context::SessionContext;
pub use memory::InMemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use store::SessionStore;

use thiserror::Error;

/// Session store errors
///
/// A missing or expired session is *not* an error — lookups return
/// `Ok(None)`. Errors mean the backing store itself misbehaved.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("session serialization failed: {0}")]
    Serialization(String),
}

impl From<redis::RedisError> for SessionError {
    fn from(err: redis::RedisError) -> Self {
        SessionError::Unavailable(err.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}
