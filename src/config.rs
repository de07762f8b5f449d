// src/config.rs
use std::{net::SocketAddr, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY environment variable is not set")]
    MissingApiKey,
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
    pub max_concurrent_requests: usize,
    pub session_ttl: Duration,
}

impl Config {
    /// Read configuration from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GOOGLE_API_KEY")
            .or_else(|| get("GEMINI_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        let max_concurrent_requests =
            parse_or(get("MAX_CONCURRENT_REQUESTS"), "MAX_CONCURRENT_REQUESTS", 8)?;
        if max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_CONCURRENT_REQUESTS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            bind_addr: parse_or(get("BIND_ADDR"), "BIND_ADDR", default_bind_addr())?,
            request_timeout: Duration::from_secs(parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                120,
            )?),
            max_concurrent_requests,
            session_ttl: Duration::from_secs(parse_or(
                get("SESSION_TTL_SECS"),
                "SESSION_TTL_SECS",
                3600,
            )?),
        })
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => {
            let parsed = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { key, value })
        }
    }
}
