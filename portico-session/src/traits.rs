//! Session data and the store trait.

use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// A server-side session.
///
/// Expiry is sliding: each access pushes `expires_at` to
/// `last_accessed_at + max_inactive_interval`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Attributes as key-value pairs
    pub data: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Idle time after which the store discards the session
    pub max_inactive_interval: Duration,
}

impl Session {
    /// Create a new session with the given ID and inactivity timeout.
    pub fn new(id: impl Into<String>, max_inactive_interval: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            data: HashMap::new(),
            created_at: now,
            last_accessed_at: now,
            expires_at: expiry_after(now, max_inactive_interval),
            max_inactive_interval,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Decode an attribute. `None` when absent or not decodable as `T`.
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> SessionResult<()> {
        let json_value =
            serde_json::to_value(value).map_err(|e| SessionError::Serialization(e.to_string()))?;
        self.data.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn keys(&self) -> Vec<&String> {
        self.data.keys().collect()
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Record an access and slide the expiry forward.
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
        self.expires_at = expiry_after(self.last_accessed_at, self.max_inactive_interval);
    }

    /// Change the inactivity timeout, measured from the last access.
    pub fn set_max_inactive_interval(&mut self, interval: Duration) {
        self.max_inactive_interval = interval;
        self.expires_at = expiry_after(self.last_accessed_at, interval);
    }

    /// Replace the inactivity timeout and count this as an access.
    pub fn extend(&mut self, interval: Duration) {
        self.max_inactive_interval = interval;
        self.touch();
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or_default()
    }
}

fn expiry_after(from: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(interval)
        .ok()
        .and_then(|delta| from.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Storage backend for sessions.
///
/// Implementations serialize concurrent access to the same id themselves;
/// callers never lock around these calls.
///
/// ```ignore
/// use portico_session::{SessionStore, SessionResult};
///
/// async fn example(store: &impl SessionStore) -> SessionResult<()> {
///     let mut session = store.create(None).await?;
///     session.set("user", "alice")?;
///     store.save(&session).await?;
///
///     let session = store.get(&session.id).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Allocate a new session with a fresh id.
    ///
    /// `ttl` is the inactivity timeout; the configured default when `None`.
    async fn create(&self, ttl: Option<Duration>) -> SessionResult<Session>;

    /// Fetch a live session, recording the access.
    ///
    /// Returns `Ok(None)` when the id is unknown or the session expired.
    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>>;

    /// Store the session under its id, replacing any previous value.
    async fn save(&self, session: &Session) -> SessionResult<()>;

    /// Invalidate a session. Unknown ids are ignored.
    async fn delete(&self, session_id: &str) -> SessionResult<()>;

    async fn exists(&self, session_id: &str) -> SessionResult<bool>;

    /// Replace a session's inactivity timeout.
    async fn extend(&self, session_id: &str, ttl: Duration) -> SessionResult<()>;

    /// Record an access without reading any attribute.
    async fn touch(&self, session_id: &str) -> SessionResult<()>;

    /// Drop every session.
    async fn clear_all(&self) -> SessionResult<()>;

    /// Number of stored sessions, expired ones not yet purged included.
    async fn count(&self) -> SessionResult<usize>;

    /// Purge expired sessions, returning how many were removed.
    async fn cleanup_expired(&self) -> SessionResult<usize>;
}

/// Generate a new unique session ID.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
