mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{PanickingGenerator, StubGenerator};
use gemini_chat_backend::services::generator::Role;
use gemini_chat_backend::services::session_manager::{DEFAULT_SESSION_ID, SessionManager};
use tokio::time::sleep;

#[tokio::test]
async fn default_session_always_exists() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    assert_eq!(mgr.len().await, 1);
    assert_eq!(mgr.get_history(DEFAULT_SESSION_ID).await, Some(vec![]));
}

#[tokio::test]
async fn sessions_are_isolated() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let stub = StubGenerator::replying("hey");

    mgr.send("alice", &stub, "hi").await;
    mgr.send("bob", &stub, "yo").await;
    mgr.send("bob", &stub, "again").await;

    assert_eq!(mgr.get_history("alice").await.unwrap().len(), 2);
    assert_eq!(mgr.get_history("bob").await.unwrap().len(), 4);
    assert_eq!(mgr.get_history(DEFAULT_SESSION_ID).await.unwrap().len(), 0);

    mgr.reset("bob").await;
    assert_eq!(mgr.get_history("bob").await.unwrap().len(), 0);
    assert_eq!(mgr.get_history("alice").await.unwrap().len(), 2);
}

#[tokio::test]
async fn reset_unknown_session_is_a_noop() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    mgr.reset("nobody").await;
    assert!(mgr.get_history("nobody").await.is_none());
}

#[tokio::test]
async fn concurrent_sends_do_not_interleave() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let stub = Arc::new(StubGenerator::replying("ok"));

    let mut handles = Vec::new();
    for i in 0..10 {
        let mgr = mgr.clone();
        let stub = stub.clone();
        handles.push(tokio::spawn(async move {
            mgr.send(DEFAULT_SESSION_ID, stub.as_ref(), &format!("msg {}", i)).await
        }));
    }
    for h in handles {
        assert_eq!(h.await.unwrap(), "ok");
    }

    let history = mgr.get_history(DEFAULT_SESSION_ID).await.unwrap();
    assert_eq!(history.len(), 20);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[1].role, Role::Model);
    }
}

#[tokio::test]
async fn test_session_expiration() {
    let mgr = SessionManager::new(Duration::from_millis(10));
    let stub = StubGenerator::replying("ok");
    mgr.send("short-lived", &stub, "hello").await;

    // Wait for expiration
    sleep(Duration::from_millis(20)).await;

    let removed_count = mgr.purge_expired().await;
    assert_eq!(removed_count, 1, "Should have removed 1 expired session");
    assert!(
        !mgr.remove_session("short-lived").await,
        "Session should already be gone"
    );
    assert!(
        mgr.list_session_ids().await.contains(&DEFAULT_SESSION_ID.to_string()),
        "Default session never expires"
    );
}

#[tokio::test]
async fn panicking_generator_leaves_session_clean() {
    let mgr = SessionManager::new(Duration::from_secs(60));
    let stub = StubGenerator::replying("ok");
    mgr.send(DEFAULT_SESSION_ID, &stub, "before").await;

    let task_mgr = mgr.clone();
    let joined = tokio::spawn(async move {
        task_mgr.send(DEFAULT_SESSION_ID, &PanickingGenerator, "boom").await
    })
    .await;
    assert!(joined.unwrap_err().is_panic());

    let history = mgr.get_history(DEFAULT_SESSION_ID).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "before");

    // The session lock is usable again after the panic.
    assert_eq!(mgr.send(DEFAULT_SESSION_ID, &stub, "after").await, "ok");
    assert_eq!(mgr.get_history(DEFAULT_SESSION_ID).await.unwrap().len(), 4);
}
