// src/logging.rs
use tracing_subscriber::EnvFilter;

// HTTP plumbing that is too chatty at info.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut directives = level.to_string();
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }
    EnvFilter::new(directives)
}

/// Install the global fmt subscriber. `RUST_LOG` overrides the default level.
pub fn init(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_target(false)
        .init();
}
