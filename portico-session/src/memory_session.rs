//! In-process session storage.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::traits::{Session, SessionStore, generate_session_id};
use async_trait::async_trait;
use portico_log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Session store backed by a map guarded by a `tokio` lock.
///
/// Suitable for a single process; sessions do not survive a restart.
/// Cloning shares the underlying map.
///
/// # Examples
///
/// ```
/// use portico_session::{MemorySessionStore, SessionConfig, SessionStore};
///
/// # tokio_test::block_on(async {
/// let store = MemorySessionStore::new(SessionConfig::memory());
///
/// let mut session = store.create(None).await.unwrap();
/// session.set("user", "alice").unwrap();
/// store.save(&session).await.unwrap();
///
/// let loaded = store.get(&session.id).await.unwrap().unwrap();
/// assert_eq!(loaded.get::<String>("user").as_deref(), Some("alice"));
/// # });
/// ```
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    config: SessionConfig,
}

impl MemorySessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::memory())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, ttl: Option<Duration>) -> SessionResult<Session> {
        let ttl = self.config.effective_ttl(ttl);
        let mut sessions = self.sessions.write().await;

        if let Some(max) = self.config.max_sessions {
            sessions.retain(|_, session| !session.is_expired());
            if sessions.len() >= max {
                return Err(SessionError::CapacityExhausted(max));
            }
        }

        let session = Session::new(generate_session_id(), ttl);
        sessions.insert(session.id.clone(), session.clone());
        debug!("Created session {} with {}s inactivity timeout", session.id, ttl.as_secs());

        Ok(session)
    }

    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>> {
        let mut sessions = self.sessions.write().await;

        if let Some(session) = sessions.get_mut(session_id) {
            if !session.is_expired() {
                session.touch();
                return Ok(Some(session.clone()));
            }
        } else {
            return Ok(None);
        }

        sessions.remove(session_id);
        debug!("Session {} expired", session_id);
        Ok(None)
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        let mut session = session.clone();
        let allowed = self.config.effective_ttl(Some(session.max_inactive_interval));
        if allowed < session.max_inactive_interval {
            session.set_max_inactive_interval(allowed);
        }

        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> SessionResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn exists(&self, session_id: &str) -> SessionResult<bool> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(session_id)
            .is_some_and(|session| !session.is_expired()))
    }

    async fn extend(&self, session_id: &str, ttl: Duration) -> SessionResult<()> {
        let ttl = self.config.effective_ttl(Some(ttl));
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(session_id) {
            Some(session) if !session.is_expired() => {
                session.extend(ttl);
                Ok(())
            }
            _ => Err(SessionError::NotFound(session_id.to_string())),
        }
    }

    async fn touch(&self, session_id: &str) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if !session.is_expired() {
                session.touch();
            }
        }
        Ok(())
    }

    async fn clear_all(&self) -> SessionResult<()> {
        self.sessions.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> SessionResult<usize> {
        Ok(self.sessions.read().await.len())
    }

    async fn cleanup_expired(&self) -> SessionResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok(before - sessions.len())
    }
}
