// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::services::generator::Generator;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>, session_ttl: Duration) -> Self {
        Self {
            sessions: SessionManager::new(session_ttl),
            generator,
        }
    }
}
