// src/routes/mod.rs
pub mod chat;

use crate::{message::StatusMessage, state::SharedState};
use axum::{
    Json, Router,
    routing::{get, post},
};
use chat::{chat_handler, history_handler, reset_handler};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let api_routes = Router::new()
        .route("/chat", post(chat_handler))
        .route("/chat/reset", post(reset_handler))
        .route("/chat/history", get(history_handler));

    Router::new()
        .route("/", get(root_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
}

async fn root_handler() -> Json<StatusMessage> {
    Json(StatusMessage::new("Backend is running!"))
}
