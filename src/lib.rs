// Portico - session login for subjects authenticated upstream
//
// This library binds an already-authenticated subject to a server-side
// session and reports the subject's principals and credentials.

// Re-export the login flow
pub use portico_auth::*;

pub use portico_core;
pub use portico_log;
pub use portico_session;

// Re-export optional crates
#[cfg(feature = "config")]
pub use portico_config;

// Prelude for common imports
pub mod prelude {
    pub use portico_auth::prelude::*;
    pub use portico_core::{HttpRequest, HttpResponse};
    pub use portico_session::{MemorySessionStore, SessionConfig, SessionStore};

    #[cfg(feature = "redis")]
    pub use portico_session::RedisSessionStore;
}
