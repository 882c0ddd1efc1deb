//! Where the authenticated subject comes from.
//!
//! The login flow never authenticates anyone itself. It asks a
//! [`SubjectContext`] for the subject an upstream layer already verified.
//! Two strategies exist, picked once at startup:
//!
//! - [`TaskSubjectContext`]: the container runs the request inside
//!   [`with_subject`], which makes the subject ambient for that task.
//! - [`RequestSubjectContext`]: a filter attaches the subject to the
//!   request's extensions before the login handler runs.

use crate::{LoginError, Result, Subject};
use portico_core::HttpRequest;
use std::future::Future;
use std::sync::Arc;

/// Environment marker selecting the request-extension strategy.
pub const SUBJECT_ATTRIBUTE_MARKER: &str = "PORTICO_SUBJECT_ATTRIBUTE";

tokio::task_local! {
    static CURRENT_SUBJECT: Arc<Subject>;
}

/// Run `f` with `subject` as the ambient subject of the current task.
pub async fn with_subject<F>(subject: Subject, f: F) -> F::Output
where
    F: Future,
{
    CURRENT_SUBJECT.scope(Arc::new(subject), f).await
}

/// The ambient subject of the current task, if any.
pub fn current_subject() -> Option<Arc<Subject>> {
    CURRENT_SUBJECT.try_with(Arc::clone).ok()
}

/// Source of the already-authenticated subject for a request.
pub trait SubjectContext: Send + Sync {
    /// The subject for this request.
    ///
    /// Fails with [`LoginError::ContextUnavailable`] when the mechanism
    /// itself is absent and [`LoginError::MissingSubject`] when it is there
    /// but holds nobody.
    fn subject(&self, request: &HttpRequest) -> Result<Arc<Subject>>;

    fn name(&self) -> &'static str;
}

/// Reads the subject installed by [`with_subject`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskSubjectContext;

impl SubjectContext for TaskSubjectContext {
    fn subject(&self, _request: &HttpRequest) -> Result<Arc<Subject>> {
        current_subject().ok_or_else(|| {
            LoginError::ContextUnavailable("no subject scope on this task".to_string())
        })
    }

    fn name(&self) -> &'static str {
        "task"
    }
}

/// Reads a subject a filter stored in the request extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSubjectContext;

impl SubjectContext for RequestSubjectContext {
    fn subject(&self, request: &HttpRequest) -> Result<Arc<Subject>> {
        request
            .extensions
            .get_arc::<Subject>()
            .ok_or(LoginError::MissingSubject)
    }

    fn name(&self) -> &'static str {
        "request"
    }
}

/// Which [`SubjectContext`] strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubjectSource {
    #[default]
    Task,
    Request,
}

impl SubjectSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "task" | "ambient" | "container" => Some(SubjectSource::Task),
            "request" | "attribute" | "filter" => Some(SubjectSource::Request),
            _ => None,
        }
    }

    /// Probe the process environment for the marker variable.
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var_os(key).is_some())
    }

    /// Probe with a custom presence check.
    pub fn detect_with<F>(is_set: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if is_set(SUBJECT_ATTRIBUTE_MARKER) {
            SubjectSource::Request
        } else {
            SubjectSource::Task
        }
    }

    pub fn context(self) -> Arc<dyn SubjectContext> {
        match self {
            SubjectSource::Task => Arc::new(TaskSubjectContext),
            SubjectSource::Request => Arc::new(RequestSubjectContext),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Principal;

    fn alice() -> Subject {
        Subject::new().with_principal(Principal::user("alice"))
    }

    #[tokio::test]
    async fn test_task_context_inside_scope() {
        let found = with_subject(alice(), async {
            TaskSubjectContext.subject(&HttpRequest::post("/auth/login"))
        })
        .await
        .unwrap();

        assert_eq!(found.principals()[0].name, "alice");
    }

    #[tokio::test]
    async fn test_task_context_outside_scope() {
        let result = TaskSubjectContext.subject(&HttpRequest::post("/auth/login"));
        assert!(matches!(result, Err(LoginError::ContextUnavailable(_))));
        assert!(current_subject().is_none());
    }

    #[tokio::test]
    async fn test_scope_does_not_leak_to_spawned_tasks() {
        let leaked = with_subject(alice(), async {
            tokio::spawn(async { current_subject().is_some() })
                .await
                .unwrap()
        })
        .await;

        assert!(!leaked);
    }

    #[test]
    fn test_request_context() {
        let request = HttpRequest::post("/auth/login").with_extension(alice());
        let found = RequestSubjectContext.subject(&request).unwrap();
        assert_eq!(found.principals().len(), 1);

        let bare = HttpRequest::post("/auth/login");
        assert!(matches!(
            RequestSubjectContext.subject(&bare),
            Err(LoginError::MissingSubject)
        ));
    }

    #[test]
    fn test_detect_with_marker() {
        assert_eq!(SubjectSource::detect_with(|_| false), SubjectSource::Task);
        assert_eq!(
            SubjectSource::detect_with(|key| key == SUBJECT_ATTRIBUTE_MARKER),
            SubjectSource::Request
        );
    }

    #[test]
    fn test_source_parse_and_context() {
        assert_eq!(SubjectSource::parse("Request"), Some(SubjectSource::Request));
        assert_eq!(SubjectSource::parse("container"), Some(SubjectSource::Task));
        assert_eq!(SubjectSource::parse("jndi"), None);
        assert_eq!(SubjectSource::Request.context().name(), "request");
        assert_eq!(SubjectSource::Task.context().name(), "task");
    }
}
