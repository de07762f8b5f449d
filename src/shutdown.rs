// src/shutdown.rs
use std::{future::Future, io};

use tracing::error;

/// Resolve once `signal` fires. If the handler could not be installed, log it
/// and never resolve, so the server keeps running instead of exiting at once.
pub async fn wait_for<F>(signal: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!(error = %e, "failed to install shutdown handler; running until killed");
        std::future::pending::<()>().await;
    }
}

/// Ctrl-C based shutdown for `axum::serve`.
pub async fn ctrl_c() {
    wait_for(tokio::signal::ctrl_c()).await;
}
