//! Session store trait

use async_trait::async_trait;

use crate::{SessionContext, SessionError};

/// Pluggable session storage
///
/// Lookups on missing or expired sessions return `Ok(None)`; callers handle
/// "no session" as a routine branch. Every mutation writes the full new state
/// back and resets the TTL to the configured window.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a fresh session, replacing any existing one under the id
    async fn create(
        &self,
        session_id: &str,
        device_id: &str,
    ) -> Result<SessionContext, SessionError>;

    /// Fetch a session if it exists and has not expired
    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError>;

    /// Append one user/assistant turn to an existing session
    async fn append_turn(
        &self,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Option<SessionContext>, SessionError>;

    /// Store the current story for multi-turn continuation
    async fn set_story(
        &self,
        session_id: &str,
        story_text: &str,
    ) -> Result<Option<SessionContext>, SessionError>;

    /// Delete a session
    async fn delete(&self, session_id: &str) -> Result<(), SessionError>;
}
