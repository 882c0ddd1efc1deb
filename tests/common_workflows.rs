//! Integration tests for common Portico workflows.
//!
//! These tests drive the login flow through the facade crate the way an
//! application would wire it up.

use portico::prelude::*;
use portico::{LoginError, SessionIdentity};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Container-managed security context
// =============================================================================

#[tokio::test]
async fn test_container_login_round_trip() {
    let store = MemorySessionStore::default();
    let service = LoginService::new(
        LoginConfig::default().with_session_timeout(Duration::from_secs(900)),
        Arc::new(store.clone()),
    );
    let subject = Subject::new()
        .with_principal(Principal::new(PrincipalKind::Keycloak, "kc-alice"))
        .with_principal(Principal::new("RolePrincipal", "admin"))
        .with_credential(Credential::new("token", serde_json::json!({"realm": "corp"})));

    let response = with_subject(subject, service.handle(&HttpRequest::post("/auth/login"))).await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers.get("Content-Type"),
        Some(&"application/json".to_string())
    );

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["principals"][0]["name"], "kc-alice");
    assert_eq!(body["principals"][1]["type"], "RolePrincipal");
    assert_eq!(body["credentials"][0]["credential"]["realm"], "corp");

    let cookie = response.headers.get("Set-Cookie").unwrap();
    let session_id = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, id)| id.to_string())
        .unwrap();

    let identity: SessionIdentity = service.identity(&session_id).await.unwrap().unwrap();
    assert_eq!(identity.username.as_deref(), Some("kc-alice"));
    assert_eq!(identity.max_inactive_interval, Duration::from_secs(900));
}

// =============================================================================
// Filter-supplied subject
// =============================================================================

#[tokio::test]
async fn test_filter_login_then_resume() {
    let store = MemorySessionStore::default();
    let service = LoginService::new(
        LoginConfig::default().with_subject_source(SubjectSource::Request),
        Arc::new(store.clone()),
    );
    let subject = Subject::new().with_principal(Principal::user("bob"));

    let first = service
        .login(&HttpRequest::post("/auth/login").with_extension(subject))
        .await
        .unwrap();
    assert!(first.created);

    let resumed = service
        .login(&HttpRequest::post("/auth/login").with_cookie("PORTICOSESSIONID", &first.session_id))
        .await
        .unwrap();
    assert!(!resumed.created);
    assert_eq!(resumed.identity, first.identity);

    let rejected = service.login(&HttpRequest::post("/auth/login")).await;
    assert!(matches!(rejected, Err(LoginError::MissingSubject)));
}

#[cfg(feature = "config")]
#[tokio::test]
async fn test_login_config_from_files() {
    use portico::portico_config::{ConfigManager, FileFormat};

    let manager = ConfigManager::new();
    manager
        .load_str(
            "sessionTimeout = 45\nknownPrincipals = [\"SimplePrincipal\"]\nsubjectSource = \"request\"\n",
            FileFormat::Toml,
        )
        .unwrap();

    let config = LoginConfig::from_config(&manager);
    let service = LoginService::new(config, Arc::new(MemorySessionStore::default()));
    let subject = Subject::new()
        .with_principal(Principal::user("not-listed"))
        .with_principal(Principal::simple("listed"));

    let outcome = service
        .login(&HttpRequest::post("/auth/login").with_extension(subject))
        .await
        .unwrap();

    assert_eq!(outcome.username.as_deref(), Some("listed"));
    assert_eq!(service.config().session_timeout, Duration::from_secs(45));
}
