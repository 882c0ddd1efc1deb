//! Integration tests for portico-session

use portico_session::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn shared_store() -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::new(SessionConfig::memory()))
}

#[tokio::test]
async fn test_store_behind_trait_object() {
    let store = shared_store();

    let mut session = store.create(Some(Duration::from_secs(60))).await.unwrap();
    session.set("user", "alice").unwrap();
    session.set("loginTime", 1_700_000_000_000i64).unwrap();
    store.save(&session).await.unwrap();

    let loaded = store.get(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded.get::<String>("user").as_deref(), Some("alice"));
    assert_eq!(loaded.get::<i64>("loginTime"), Some(1_700_000_000_000));
    assert_eq!(loaded.max_inactive_interval, Duration::from_secs(60));
}

#[tokio::test]
async fn test_concurrent_creates_are_unique() {
    let store = shared_store();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.create(None).await.unwrap().id })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 32);
    assert_eq!(store.count().await.unwrap(), 32);
}

#[tokio::test]
async fn test_delete_then_get() {
    let store = shared_store();
    let session = store.create(None).await.unwrap();

    store.delete(&session.id).await.unwrap();

    assert!(store.get(&session.id).await.unwrap().is_none());
    assert!(!store.exists(&session.id).await.unwrap());
    // deleting twice is harmless
    store.delete(&session.id).await.unwrap();
}

#[tokio::test]
async fn test_expiry_and_cleanup() {
    let store = shared_store();
    let short = store.create(Some(Duration::from_secs(1))).await.unwrap();
    let long = store.create(Some(Duration::from_secs(600))).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(store.cleanup_expired().await.unwrap(), 1);
    assert!(!store.exists(&short.id).await.unwrap());
    assert!(store.exists(&long.id).await.unwrap());
}

#[tokio::test]
async fn test_extend_and_touch() {
    let store = shared_store();
    let session = store.create(Some(Duration::from_secs(1))).await.unwrap();

    store.extend(&session.id, Duration::from_secs(300)).await.unwrap();
    store.touch(&session.id).await.unwrap();

    let loaded = store.get(&session.id).await.unwrap().unwrap();
    assert_eq!(loaded.max_inactive_interval, Duration::from_secs(300));
    assert!(loaded.remaining() > Duration::from_secs(290));

    assert!(matches!(
        store.extend("missing", Duration::from_secs(1)).await,
        Err(SessionError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_ttl_is_capped() {
    let store = MemorySessionStore::new(SessionConfig::memory().with_max_ttl(Duration::from_secs(120)));

    let session = store.create(Some(Duration::from_secs(3600))).await.unwrap();

    assert_eq!(session.max_inactive_interval, Duration::from_secs(120));
}

#[tokio::test]
async fn test_clear_all() {
    let store = shared_store();
    for _ in 0..3 {
        store.create(None).await.unwrap();
    }

    store.clear_all().await.unwrap();

    assert_eq!(store.count().await.unwrap(), 0);
}
