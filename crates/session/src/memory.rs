//! In-memory session store
//!
//! Development and test backend with the same observable TTL behavior as the
//! Redis store: expiry is enforced at read time against a per-entry deadline,
//! and every write slides the deadline forward by the full window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{SessionContext, SessionError, SessionStore};

struct Entry {
    context: SessionContext,
    deadline: Instant,
}

pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn chrono_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.ttl.as_millis() as i64)
    }

    /// Fetch a live copy, dropping the entry if its deadline passed
    fn live_copy(&self, session_id: &str) -> Option<SessionContext> {
        let expired = {
            let entries = self.entries.read();
            match entries.get(session_id) {
                Some(entry) if entry.deadline > Instant::now() => {
                    return Some(entry.context.clone())
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().remove(session_id);
        }
        None
    }

    fn put(&self, context: SessionContext) {
        self.entries.write().insert(
            context.session_id.clone(),
            Entry {
                context,
                deadline: Instant::now() + self.ttl,
            },
        );
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        session_id: &str,
        device_id: &str,
    ) -> Result<SessionContext, SessionError> {
        let context = SessionContext::new(session_id, device_id, self.chrono_ttl());
        self.put(context.clone());
        Ok(context)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError> {
        Ok(self.live_copy(session_id))
    }

    async fn append_turn(
        &self,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Option<SessionContext>, SessionError> {
        let Some(mut context) = self.live_copy(session_id) else {
            return Ok(None);
        };

        context.push_turn(user_text, assistant_text);
        context.touch(self.chrono_ttl());
        self.put(context.clone());
        Ok(Some(context))
    }

    async fn set_story(
        &self,
        session_id: &str,
        story_text: &str,
    ) -> Result<Option<SessionContext>, SessionError> {
        let Some(mut context) = self.live_copy(session_id) else {
            return Ok(None);
        };

        context.current_story = Some(story_text.to_string());
        context.touch(self.chrono_ttl());
        self.put(context.clone());
        Ok(Some(context))
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        self.entries.write().remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plushpal_core::Role;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn round_trip() {
        let store = store();
        let created = store.create("s1", "d1").await.unwrap();
        assert_eq!(created.expires_at - created.created_at, chrono::Duration::seconds(60));

        let fetched = store.get("s1").await.unwrap().unwrap();
        assert!(fetched.messages.is_empty());
        assert_eq!(fetched.device_id, "d1");
    }

    #[tokio::test]
    async fn append_turn_records_both_messages_in_order() {
        let store = store();
        store.create("s1", "d1").await.unwrap();
        store.append_turn("s1", "hi", "hello").await.unwrap().unwrap();

        let fetched = store.get("s1").await.unwrap().unwrap();
        assert_eq!(fetched.messages.len(), 2);
        assert_eq!(fetched.messages[0].role, Role::User);
        assert_eq!(fetched.messages[0].content, "hi");
        assert_eq!(fetched.messages[1].role, Role::Assistant);
        assert_eq!(fetched.messages[1].content, "hello");
    }

    #[tokio::test]
    async fn missing_session_is_none_not_error() {
        let store = store();
        assert!(store.get("nope").await.unwrap().is_none());
        assert!(store.append_turn("nope", "a", "b").await.unwrap().is_none());
        assert!(store.set_story("nope", "tale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn expired_session_reads_as_missing() {
        let store = InMemorySessionStore::new(Duration::from_millis(20));
        store.create("s1", "d1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.get("s1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_slide_the_deadline() {
        let store = InMemorySessionStore::new(Duration::from_millis(80));
        store.create("s1", "d1").await.unwrap();

        // keep the session warm past its original deadline
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.append_turn("s1", "a", "b").await.unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.get("s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn set_story_persists() {
        let store = store();
        store.create("s1", "d1").await.unwrap();
        store.set_story("s1", "once upon a time").await.unwrap().unwrap();
        let fetched = store.get("s1").await.unwrap().unwrap();
        assert_eq!(fetched.current_story.as_deref(), Some("once upon a time"));
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let store = store();
        store.create("s1", "d1").await.unwrap();
        store.delete("s1").await.unwrap();
        assert!(store.get("s1").await.unwrap().is_none());
    }
}
