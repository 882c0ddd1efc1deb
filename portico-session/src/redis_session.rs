//! Redis session storage.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::traits::{Session, SessionStore, generate_session_id};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Redis-backed session store.
///
/// Each session is one JSON string whose key TTL tracks the inactivity
/// timeout, so Redis itself drops idle sessions.
///
/// ```no_run
/// use portico_session::{RedisSessionStore, SessionConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SessionConfig::redis("redis://localhost:6379")?.with_namespace("portico:session");
/// let store = RedisSessionStore::new(config).await?;
/// # Ok(())
/// # }
/// ```
pub struct RedisSessionStore {
    conn: ConnectionManager,
    config: SessionConfig,
}

impl RedisSessionStore {
    pub async fn new(config: SessionConfig) -> SessionResult<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        Ok(Self { conn, config })
    }

    async fn keys(&self) -> SessionResult<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}:*", self.config.namespace);

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(&pattern)
            .query_async(&mut conn)
            .await?;
        Ok(keys)
    }

    async fn load(&self, session_id: &str) -> SessionResult<Option<Session>> {
        let mut conn = self.conn.clone();
        let data: Option<String> = conn.get(self.config.session_key(session_id)).await?;

        data.map(|json| {
            serde_json::from_str(&json).map_err(|e| SessionError::Deserialization(e.to_string()))
        })
        .transpose()
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, ttl: Option<Duration>) -> SessionResult<Session> {
        let session = Session::new(generate_session_id(), self.config.effective_ttl(ttl));
        self.save(&session).await?;
        Ok(session)
    }

    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>> {
        match self.load(session_id).await? {
            Some(session) if session.is_expired() => {
                self.delete(session_id).await?;
                Ok(None)
            }
            Some(mut session) => {
                session.touch();
                self.save(&session).await?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(session)
            .map_err(|e| SessionError::Serialization(e.to_string()))?;

        let ttl = key_ttl_secs(self.config.effective_ttl(Some(session.remaining())));
        let _: () = conn
            .set_ex(self.config.session_key(&session.id), json, ttl)
            .await?;

        Ok(())
    }

    async fn delete(&self, session_id: &str) -> SessionResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(self.config.session_key(session_id)).await?;
        Ok(())
    }

    async fn exists(&self, session_id: &str) -> SessionResult<bool> {
        Ok(self
            .load(session_id)
            .await?
            .is_some_and(|session| !session.is_expired()))
    }

    async fn extend(&self, session_id: &str, ttl: Duration) -> SessionResult<()> {
        let mut session = self
            .load(session_id)
            .await?
            .filter(|session| !session.is_expired())
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        session.extend(self.config.effective_ttl(Some(ttl)));
        self.save(&session).await
    }

    async fn touch(&self, session_id: &str) -> SessionResult<()> {
        self.get(session_id).await.map(|_| ())
    }

    async fn clear_all(&self) -> SessionResult<()> {
        let keys = self.keys().await?;
        if !keys.is_empty() {
            let mut conn = self.conn.clone();
            let _: () = conn.del(keys).await?;
        }
        Ok(())
    }

    async fn count(&self) -> SessionResult<usize> {
        Ok(self.keys().await?.len())
    }

    async fn cleanup_expired(&self) -> SessionResult<usize> {
        // key TTLs already evict idle sessions
        Ok(0)
    }
}

// Redis rejects a zero expiry, so partial seconds round up
fn key_ttl_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    secs.max(1)
}
