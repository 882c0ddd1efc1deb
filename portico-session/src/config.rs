//! Session configuration.

use crate::error::{SessionError, SessionResult};
use std::time::Duration;

/// Default inactivity timeout: half an hour.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(1800);

/// Default name of the cookie carrying the session id.
pub const DEFAULT_COOKIE_NAME: &str = "PORTICOSESSIONID";

/// Session backend type.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionBackend {
    /// Process-local map
    Memory,
    /// Redis backend
    Redis,
}

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    /// Connection URL (unused by the memory backend)
    pub url: String,
    /// Key prefix for backends with a shared keyspace
    pub namespace: String,
    /// Inactivity timeout used when `create` is given none
    pub default_ttl: Duration,
    /// Upper bound on any requested inactivity timeout, none by default
    pub max_ttl: Option<Duration>,
    /// Maximum number of live sessions, memory backend only
    pub max_sessions: Option<usize>,
    pub cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            url: String::new(),
            namespace: "session".to_string(),
            default_ttl: DEFAULT_SESSION_TIMEOUT,
            max_ttl: None,
            max_sessions: None,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }
}

impl SessionConfig {
    /// In-memory session configuration.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Redis session configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use portico_session::SessionConfig;
    ///
    /// let config = SessionConfig::redis("redis://localhost:6379").unwrap();
    /// assert!(SessionConfig::redis("http://localhost").is_err());
    /// ```
    pub fn redis(url: &str) -> SessionResult<Self> {
        if !url.starts_with("redis://") && !url.starts_with("rediss://") {
            return Err(SessionError::InvalidUrl(
                "Redis URL must start with redis:// or rediss://".to_string(),
            ));
        }

        Ok(Self {
            backend: SessionBackend::Redis,
            url: url.to_string(),
            ..Default::default()
        })
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = Some(ttl);
        self
    }

    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = Some(max);
        self
    }

    pub fn with_cookie_name(mut self, name: &str) -> Self {
        self.cookie_name = name.to_string();
        self
    }

    /// Clamp a requested timeout to `max_ttl`, defaulting to `default_ttl`.
    pub fn effective_ttl(&self, requested: Option<Duration>) -> Duration {
        let ttl = requested.unwrap_or(self.default_ttl);
        match self.max_ttl {
            Some(max) => ttl.min(max),
            None => ttl,
        }
    }

    /// Build the session key with namespace.
    pub fn session_key(&self, session_id: &str) -> String {
        format!("{}:{}", self.namespace, session_id)
    }
}
