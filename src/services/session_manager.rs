// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::{Mutex, RwLock};

use super::conversation::{Conversation, SendError};
use super::generator::{Generator, Turn};

/// Session used when a request does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

#[derive(Debug)]
pub struct Session {
    pub conversation: Conversation,
    pub last_active: Instant,
}

impl Session {
    pub fn new() -> Self {
        Self { conversation: Conversation::new(), last_active: Instant::now() }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

type SessionHandle = Arc<Mutex<Session>>;

/// Named conversations. Each session has its own lock, held for the whole of a
/// send, so turns within one transcript never interleave.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, SessionHandle>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    // Create a new manager holding only the default session.
    pub fn new(ttl: Duration) -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(DEFAULT_SESSION_ID.to_string(), Arc::new(Mutex::new(Session::new())));
        Self {
            inner: Arc::new(RwLock::new(sessions)),
            ttl,
        }
    }

    // Get the session with this id, creating it if needed.
    async fn ensure_session(&self, id: &str) -> SessionHandle {
        {
            let guard = self.inner.read().await;
            if let Some(session) = guard.get(id) {
                return session.clone();
            }
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone()
    }

    /// Send a message on a session and return the reply (or its sentinel text).
    pub async fn send<G>(&self, session_id: &str, generator: &G, text: &str) -> String
    where
        G: Generator + ?Sized,
    {
        if text.trim().is_empty() {
            return SendError::EmptyInput.reply();
        }
        let handle = self.ensure_session(session_id).await;
        let mut session = handle.lock().await;
        let reply = session.conversation.send(generator, text).await;
        session.last_active = Instant::now();
        reply
    }

    /// Empty a session's transcript. Unknown ids are a no-op.
    pub async fn reset(&self, session_id: &str) {
        let handle = {
            let guard = self.inner.read().await;
            guard.get(session_id).cloned()
        };
        if let Some(handle) = handle {
            let mut session = handle.lock().await;
            session.conversation.reset();
            session.last_active = Instant::now();
        }
    }

    /// Get a copy of the session history
    pub async fn get_history(&self, session_id: &str) -> Option<Vec<Turn>> {
        let handle = {
            let guard = self.inner.read().await;
            guard.get(session_id).cloned()
        }?;
        let session = handle.lock().await;
        Some(session.conversation.history().to_vec())
    }

    /// Remove a session by id. The default session is only reset.
    pub async fn remove_session(&self, session_id: &str) -> bool {
        if session_id == DEFAULT_SESSION_ID {
            self.reset(session_id).await;
            return false;
        }
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove named sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|id, handle| {
            if id == DEFAULT_SESSION_ID {
                return true;
            }
            match handle.try_lock() {
                Ok(session) => now.duration_since(session.last_active) < self.ttl,
                // Busy with a send, so not idle.
                Err(_) => true,
            }
        });
        before - guard.len()
    }

    /// Number of sessions, including the default one
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    /// List session ids
    pub async fn list_session_ids(&self) -> Vec<String> {
        let guard = self.inner.read().await;
        guard.keys().cloned().collect()
    }
}
