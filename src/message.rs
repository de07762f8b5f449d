// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::generator::Turn;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub content: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Deserialize, Default)]
pub struct SessionQuery {
    pub session_id: Option<String>,
}

/// `{"message": ...}` body used by the reset and liveness routes.
#[derive(Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<Turn>,
}
