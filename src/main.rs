use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use gemini_chat_backend::{
    config::Config,
    logging,
    routes,
    services::{gemini::GeminiClient, generator::LimitedGenerator},
    shutdown,
    state::AppState,
};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");

    let config = Config::from_env().context("loading configuration")?;

    let client = GeminiClient::new(
        config.api_key.clone(),
        config.model.clone(),
        config.base_url.clone(),
        config.request_timeout,
    )
    .context("building HTTP client")?;
    info!(model = client.model(), max_concurrent = config.max_concurrent_requests, "generator ready");

    let generator = LimitedGenerator::new(client, config.max_concurrent_requests);
    let state = Arc::new(AppState::new(Arc::new(generator), config.session_ttl));

    // Periodically drop idle named sessions.
    let sessions = state.sessions.clone();
    let every = (config.session_ttl / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                debug!(removed, "purged idle sessions");
            }
        }
    });

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router()
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!("chat backend listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::ctrl_c())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}
