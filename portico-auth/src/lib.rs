//! Session login for pre-authenticated subjects.
//!
//! Authentication happens upstream, in a container or a filter. This crate
//! takes the subject that layer produced, binds it to a server-side session
//! and answers with the subject's principals and public credentials.
//!
//! ## Features
//!
//! - **Session binding**: first call creates a session, later calls with the
//!   session cookie reuse it
//! - **Username derivation**: an ordered allow-list of principal kinds picks
//!   the principal that names the user
//! - **Pluggable subject source**: task-local scope or request extension
//!
//! ## Quick Start
//!
//! ```
//! use portico_auth::{LoginConfig, LoginService, Principal, Subject, with_subject};
//! use portico_core::HttpRequest;
//! use portico_session::MemorySessionStore;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let service = LoginService::new(LoginConfig::default(), Arc::new(MemorySessionStore::default()));
//! let subject = Subject::new().with_principal(Principal::user("alice"));
//!
//! let request = HttpRequest::post("/auth/login");
//! let response = with_subject(subject, service.handle(&request)).await;
//!
//! assert_eq!(response.status, 200);
//! assert!(response.headers.contains_key("Set-Cookie"));
//! # });
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod login;
pub mod principals;
pub mod response;
pub mod subject;

pub use config::{LoginConfig, parse_session_timeout};
pub use context::{
    RequestSubjectContext, SUBJECT_ATTRIBUTE_MARKER, SubjectContext, SubjectSource,
    TaskSubjectContext, current_subject, with_subject,
};
pub use error::{LoginError, Result};
pub use login::{LoginOutcome, LoginService, SessionIdentity};
pub use principals::{
    DEFAULT_RECOGNIZED_KINDS, RecognizedPrincipalKinds, username_from_subject, username_principal,
};
pub use response::{CredentialEntry, IdentityResponse, PrincipalEntry};
pub use subject::{Credential, PRINCIPAL_NAMESPACE, Principal, PrincipalKind, Subject};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::config::LoginConfig;
    pub use crate::context::{SubjectSource, with_subject};
    pub use crate::error::{LoginError, Result};
    pub use crate::login::{LoginOutcome, LoginService};
    pub use crate::response::IdentityResponse;
    pub use crate::subject::{Credential, Principal, PrincipalKind, Subject};
}
