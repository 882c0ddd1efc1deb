//! Session storage for Portico.
//!
//! Sessions carry JSON attributes and a sliding inactivity timeout. The
//! store, not the caller, enforces expiry: a session idle for longer than
//! its `max_inactive_interval` reads back as absent.
//!
//! # Features
//!
//! - in-memory storage (always available)
//! - `redis` - Redis session storage
//!
//! # Example
//!
//! ```
//! use portico_session::*;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let store = MemorySessionStore::new(
//!     SessionConfig::memory().with_default_ttl(Duration::from_secs(600)),
//! );
//!
//! let mut session = store.create(None).await?;
//! session.set("user", "alice")?;
//! store.save(&session).await?;
//!
//! store.delete(&session.id).await?;
//! assert!(store.get(&session.id).await?.is_none());
//! # Ok::<(), SessionError>(())
//! # });
//! ```

pub mod config;
pub mod error;
pub mod memory_session;
pub mod traits;

#[cfg(feature = "redis")]
pub mod redis_session;

pub use config::{DEFAULT_COOKIE_NAME, DEFAULT_SESSION_TIMEOUT, SessionBackend, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use memory_session::MemorySessionStore;
pub use traits::{Session, SessionStore, generate_session_id};

#[cfg(feature = "redis")]
pub use redis_session::RedisSessionStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{SessionBackend, SessionConfig};
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::memory_session::MemorySessionStore;
    pub use crate::traits::{Session, SessionStore, generate_session_id};

    #[cfg(feature = "redis")]
    pub use crate::redis_session::RedisSessionStore;
}
