//! Session login for pre-authenticated subjects.
//!
//! A request either carries the cookie of a live session, in which case the
//! subject stored at login is reported back, or it does not, in which case
//! the subject is taken from the configured [`SubjectContext`] and bound to a
//! new session.

use crate::{
    IdentityResponse, LoginConfig, LoginError, Result, Subject, SubjectContext,
    username_from_subject,
};
use chrono::{DateTime, Utc};
use portico_core::{HttpRequest, HttpResponse};
use portico_log::{debug, error, info, warn};
use portico_session::{Session, SessionStore};
use std::sync::Arc;
use std::time::Duration;

/// Session attribute holding the serialized subject.
pub const SUBJECT_ATTRIBUTE: &str = "subject";
/// Session attribute holding the derived username (null when none).
pub const USER_ATTRIBUTE: &str = "user";
pub const REMOTE_USER_ATTRIBUTE: &str = "authentication.remote.user";
pub const AUTH_TYPE_ATTRIBUTE: &str = "authentication.type";
/// Session attribute holding the login instant in epoch milliseconds.
pub const LOGIN_TIME_ATTRIBUTE: &str = "loginTime";
/// Authentication type recorded for every session created here.
pub const BASIC_AUTH: &str = "BASIC";

/// Result of a successful login call.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub session_id: String,
    /// True when this call created the session
    pub created: bool,
    pub username: Option<String>,
    pub identity: IdentityResponse,
}

/// Login attributes read back from a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionIdentity {
    pub session_id: String,
    pub username: Option<String>,
    pub remote_user: Option<String>,
    pub auth_type: Option<String>,
    pub login_time: Option<DateTime<Utc>>,
    pub max_inactive_interval: Duration,
}

impl SessionIdentity {
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            username: session.get::<Option<String>>(USER_ATTRIBUTE).flatten(),
            remote_user: session.get::<Option<String>>(REMOTE_USER_ATTRIBUTE).flatten(),
            auth_type: session.get(AUTH_TYPE_ATTRIBUTE),
            login_time: session
                .get::<i64>(LOGIN_TIME_ATTRIBUTE)
                .and_then(DateTime::from_timestamp_millis),
            max_inactive_interval: session.max_inactive_interval,
        }
    }
}

/// Binds upstream-authenticated subjects to sessions.
#[derive(Clone)]
pub struct LoginService {
    config: Arc<LoginConfig>,
    store: Arc<dyn SessionStore>,
    context: Arc<dyn SubjectContext>,
}

impl LoginService {
    /// Create a service using the subject strategy named by `config`.
    pub fn new(config: LoginConfig, store: Arc<dyn SessionStore>) -> Self {
        let context = config.subject_source.context();
        Self::with_context(config, store, context)
    }

    /// Create a service with an explicit subject strategy.
    pub fn with_context(
        config: LoginConfig,
        store: Arc<dyn SessionStore>,
        context: Arc<dyn SubjectContext>,
    ) -> Self {
        info!(
            "login is using {} sec. session timeout, subject source '{}'",
            config.session_timeout.as_secs(),
            context.name()
        );

        Self {
            config: Arc::new(config),
            store,
            context,
        }
    }

    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    /// Resolve the identity for `request`, creating a session if needed.
    pub async fn login(&self, request: &HttpRequest) -> Result<LoginOutcome> {
        match self.existing_session(request).await? {
            Some(session) => self.resume(session).await,
            None => self.establish(request).await,
        }
    }

    /// [`login`](Self::login) rendered as an HTTP response.
    ///
    /// Success is a JSON [`IdentityResponse`], with a session cookie when the
    /// session is new. Rejections are a bare 403, store failures a bare 500.
    pub async fn handle(&self, request: &HttpRequest) -> HttpResponse {
        match self.login(request).await.and_then(|outcome| self.respond(outcome)) {
            Ok(response) => response,
            Err(err) if err.is_rejection() => {
                debug!("Login rejected: {}", err);
                HttpResponse::forbidden()
            }
            Err(err) => {
                error!("Login failed: {}", err);
                HttpResponse::internal_server_error()
            }
        }
    }

    /// Login attributes of a live session.
    pub async fn identity(&self, session_id: &str) -> Result<Option<SessionIdentity>> {
        Ok(self
            .store
            .get(session_id)
            .await?
            .map(|session| SessionIdentity::from_session(&session)))
    }

    async fn existing_session(&self, request: &HttpRequest) -> Result<Option<Session>> {
        match request.cookie(&self.config.session_cookie) {
            Some(session_id) => Ok(self.store.get(session_id).await?),
            None => Ok(None),
        }
    }

    async fn resume(&self, session: Session) -> Result<LoginOutcome> {
        let Some(subject) = session.get::<Subject>(SUBJECT_ATTRIBUTE) else {
            warn!(
                "No security subject stored in existing session {}, invalidating",
                session.id
            );
            self.store.delete(&session.id).await?;
            return Err(LoginError::CorruptedSession(session.id));
        };

        Ok(LoginOutcome {
            identity: IdentityResponse::from_subject(&subject),
            username: session.get::<Option<String>>(USER_ATTRIBUTE).flatten(),
            session_id: session.id,
            created: false,
        })
    }

    async fn establish(&self, request: &HttpRequest) -> Result<LoginOutcome> {
        let subject = self.context.subject(request)?;
        let username = username_from_subject(&subject, &self.config.recognized_kinds);

        let mut session = self.store.create(Some(self.config.session_timeout)).await?;
        if let Err(err) = self.bind(&mut session, &subject, username.as_deref()).await {
            // never leave a session without its subject behind
            if let Err(cleanup) = self.store.delete(&session.id).await {
                warn!(
                    "Could not remove half-built session {}: {}",
                    session.id, cleanup
                );
            }
            return Err(err);
        }

        debug!(
            "Session timeout for user {} is {} sec.",
            username.as_deref().unwrap_or("<none>"),
            session.max_inactive_interval.as_secs()
        );

        Ok(LoginOutcome {
            session_id: session.id,
            created: true,
            username,
            identity: IdentityResponse::from_subject(&subject),
        })
    }

    async fn bind(
        &self,
        session: &mut Session,
        subject: &Subject,
        username: Option<&str>,
    ) -> Result<()> {
        session.set(SUBJECT_ATTRIBUTE, subject)?;
        session.set(USER_ATTRIBUTE, username)?;
        session.set(REMOTE_USER_ATTRIBUTE, username)?;
        session.set(AUTH_TYPE_ATTRIBUTE, BASIC_AUTH)?;
        session.set(LOGIN_TIME_ATTRIBUTE, Utc::now().timestamp_millis())?;
        session.set_max_inactive_interval(self.config.session_timeout);

        self.store.save(session).await?;
        Ok(())
    }

    fn respond(&self, outcome: LoginOutcome) -> Result<HttpResponse> {
        let response = HttpResponse::ok().with_json(&outcome.identity)?;
        if outcome.created {
            Ok(response.with_cookie(&self.config.session_cookie, &outcome.session_id))
        } else {
            Ok(response)
        }
    }
}
