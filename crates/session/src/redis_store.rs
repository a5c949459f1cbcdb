//! Redis-backed session store
//!
//! Sessions are JSON values under `session:{id}` with a server-side TTL.
//! Every write uses `SET ... EX`, so an active conversation keeps sliding its
//! window forward while an idle one expires on the Redis side with no sweeper
//! needed here.
//!
//! Mutations are read-modify-write without a CAS guard: two concurrent turns
//! on the same session can race and one turn's messages can be lost.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::OnceCell;

use crate::{SessionContext, SessionError, SessionStore};

pub struct RedisSessionStore {
    client: redis::Client,
    connection: OnceCell<MultiplexedConnection>,
    ttl: Duration,
}

impl RedisSessionStore {
    /// Create a store for the given Redis URL
    ///
    /// The connection itself is established lazily on first use.
    pub fn new(redis_url: &str, ttl: Duration) -> Result<Self, SessionError> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
            ttl,
        })
    }

    fn session_key(session_id: &str) -> String {
        format!("session:{}", session_id)
    }

    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }

    fn chrono_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl.as_secs() as i64)
    }

    /// Get (or lazily establish) the shared connection; idempotent
    async fn connection(&self) -> Result<MultiplexedConnection, SessionError> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                tracing::info!("connecting to Redis session store");
                self.client.get_multiplexed_tokio_connection().await
            })
            .await?;
        Ok(conn.clone())
    }

    async fn write(&self, context: &SessionContext) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let payload = serde_json::to_string(context)?;
        let _: () = conn
            .set_ex(Self::session_key(&context.session_id), payload, self.ttl_secs())
            .await?;
        Ok(())
    }

    async fn read(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError> {
        let mut conn = self.connection().await?;
        let payload: Option<String> = conn.get(Self::session_key(session_id)).await?;
        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(
        &self,
        session_id: &str,
        device_id: &str,
    ) -> Result<SessionContext, SessionError> {
        let context = SessionContext::new(session_id, device_id, self.chrono_ttl());
        self.write(&context).await?;
        tracing::debug!(session_id, device_id, "session created");
        Ok(context)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionContext>, SessionError> {
        self.read(session_id).await
    }

    async fn append_turn(
        &self,
        session_id: &str,
        user_text: &str,
        assistant_text: &str,
    ) -> Result<Option<SessionContext>, SessionError> {
        let Some(mut context) = self.read(session_id).await? else {
            return Ok(None);
        };

        context.push_turn(user_text, assistant_text);
        context.touch(self.chrono_ttl());
        self.write(&context).await?;
        Ok(Some(context))
    }

    async fn set_story(
        &self,
        session_id: &str,
        story_text: &str,
    ) -> Result<Option<SessionContext>, SessionError> {
        let Some(mut context) = self.read(session_id).await? else {
            return Ok(None);
        };

        context.current_story = Some(story_text.to_string());
        context.touch(self.chrono_ttl());
        self.write(&context).await?;
        Ok(Some(context))
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(Self::session_key(session_id)).await?;
        tracing::debug!(session_id, "session deleted");
        Ok(())
    }
}
