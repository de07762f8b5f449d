// src/routes/chat.rs
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use tracing::{error, info};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, HistoryResponse, SessionQuery, StatusMessage},
    services::session_manager::DEFAULT_SESSION_ID,
    state::SharedState,
};

fn session_id(requested: Option<&str>) -> String {
    match requested {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_SESSION_ID.to_string(),
    }
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("Message content cannot be empty".to_string()));
    }

    let session_id = session_id(payload.session_id.as_deref());

    // Run the send on its own task so a panic surfaces as a 500, not a dropped connection.
    let task_state = state.clone();
    let response = tokio::spawn(async move {
        task_state
            .sessions
            .send(&session_id, task_state.generator.as_ref(), &payload.content)
            .await
    })
    .await
    .map_err(|e| {
        error!(error = %e, "chat dispatch failed");
        AppError::Internal(e.to_string())
    })?;

    Ok(Json(ChatResponse { response }))
}

pub async fn reset_handler(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<StatusMessage>, AppError> {
    let session_id = session_id(query.session_id.as_deref());
    state.sessions.reset(&session_id).await;
    info!(session = %session_id, "chat history reset");
    Ok(Json(StatusMessage::new("Chat history reset successfully")))
}

pub async fn history_handler(
    State(state): State<SharedState>,
    Query(query): Query<SessionQuery>,
) -> Json<HistoryResponse> {
    let session_id = session_id(query.session_id.as_deref());
    let history = state.sessions.get_history(&session_id).await.unwrap_or_default();
    Json(HistoryResponse { history })
}
