//! Session context type

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use plushpal_core::Message;

/// One ongoing conversation with one device
///
/// The message sequence is append-only until the session is deleted.
/// `expires_at` is `created_at + TTL` at creation and refreshed to
/// `now + TTL` on every mutation (the TTL slides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub device_id: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Story being told across turns, for continuation requests
    #[serde(default)]
    pub current_story: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, device_id: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            device_id: device_id.into(),
            messages: Vec::new(),
            current_story: None,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Record one turn: the user's utterance followed by the reply
    pub fn push_turn(&mut self, user_text: &str, assistant_text: &str) {
        self.messages.push(Message::user(user_text));
        self.messages.push(Message::assistant(assistant_text));
    }

    /// Slide the expiry window forward from now
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Utc::now() + ttl;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plushpal_core::Role;

    #[test]
    fn new_session_expires_one_ttl_after_creation() {
        let ttl = Duration::minutes(30);
        let ctx = SessionContext::new("s1", "d1", ttl);
        assert!(ctx.messages.is_empty());
        assert_eq!(ctx.expires_at - ctx.created_at, ttl);
    }

    #[test]
    fn push_turn_appends_in_order() {
        let mut ctx = SessionContext::new("s1", "d1", Duration::minutes(30));
        ctx.push_turn("hi", "hello");
        assert_eq!(ctx.messages.len(), 2);
        assert_eq!(ctx.messages[0].role, Role::User);
        assert_eq!(ctx.messages[0].content, "hi");
        assert_eq!(ctx.messages[1].role, Role::Assistant);
        assert_eq!(ctx.messages[1].content, "hello");
    }

    #[test]
    fn touch_slides_expiry_forward() {
        let mut ctx = SessionContext::new("s1", "d1", Duration::minutes(30));
        let before = ctx.expires_at;
        ctx.touch(Duration::minutes(60));
        assert!(ctx.expires_at > before);
    }
}
