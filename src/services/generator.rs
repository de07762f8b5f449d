// src/services/generator.rs
use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One entry of a conversation transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Auth,
    RateLimit,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct GenerateError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GenerateError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Build an error from its text alone, for failures with no status attached.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let kind = if lower.contains("api key") {
            ErrorKind::Auth
        } else if lower.contains("rate limit") {
            ErrorKind::RateLimit
        } else {
            ErrorKind::Other
        };
        Self { kind, message }
    }

    /// Build an error from an HTTP status and the API's status string, if any.
    pub fn from_status(status: u16, api_status: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = match (status, api_status) {
            (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => ErrorKind::Auth,
            (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => ErrorKind::RateLimit,
            _ => return Self::classify(message),
        };
        Self { kind, message }
    }
}

/// Text generation backend. `Ok(None)` means the call succeeded but produced no text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, transcript: &[Turn]) -> Result<Option<String>, GenerateError>;
}

#[async_trait]
impl<G: Generator + ?Sized> Generator for Arc<G> {
    async fn generate(&self, transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        (**self).generate(transcript).await
    }
}

/// Caps the number of generate calls in flight at once.
pub struct LimitedGenerator<G> {
    inner: G,
    permits: Semaphore,
}

impl<G: Generator> LimitedGenerator<G> {
    pub fn new(inner: G, max_concurrent: usize) -> Self {
        Self { inner, permits: Semaphore::new(max_concurrent.max(1)) }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl<G: Generator> Generator for LimitedGenerator<G> {
    async fn generate(&self, transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| GenerateError::new(ErrorKind::Other, e.to_string()))?;
        self.inner.generate(transcript).await
    }
}
