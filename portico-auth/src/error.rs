// Error types for session login

use portico_session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoginError {
    #[error("No authenticated subject available")]
    MissingSubject,

    #[error("Subject context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Session {0} carries no usable subject")]
    CorruptedSession(String),

    #[error("Invalid login configuration: {0}")]
    InvalidConfig(String),

    #[error("Session store error: {0}")]
    Session(#[from] SessionError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoginError {
    /// Whether the caller is simply denied, as opposed to a server failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            LoginError::MissingSubject
                | LoginError::ContextUnavailable(_)
                | LoginError::CorruptedSession(_)
        )
    }

    pub fn status_code(&self) -> u16 {
        if self.is_rejection() { 403 } else { 500 }
    }
}

impl From<portico_core::Error> for LoginError {
    fn from(err: portico_core::Error) -> Self {
        LoginError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LoginError>;
