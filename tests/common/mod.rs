use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use gemini_chat_backend::services::generator::{GenerateError, Generator, Turn};

/// Generator that replays a fixed outcome and records what it was shown.
pub struct StubGenerator {
    outcome: Result<Option<String>, GenerateError>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<Vec<Turn>>>,
}

#[allow(dead_code)]
impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with(Ok(Some(text.to_string())))
    }

    pub fn empty() -> Self {
        Self::with(Ok(None))
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Err(GenerateError::classify(message)))
    }

    pub fn with(outcome: Result<Option<String>, GenerateError>) -> Self {
        Self { outcome, calls: AtomicUsize::new(0), seen: Mutex::new(Vec::new()) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn generate(&self, transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(transcript.to_vec());
        self.outcome.clone()
    }
}

/// Generator whose call panics before producing anything.
#[allow(dead_code)]
pub struct PanickingGenerator;

#[async_trait]
impl Generator for PanickingGenerator {
    async fn generate(&self, _transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        panic!("generator blew up");
    }
}

/// Generator that never finishes, for exercising dropped sends.
#[allow(dead_code)]
pub struct PendingGenerator;

#[async_trait]
impl Generator for PendingGenerator {
    async fn generate(&self, _transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        std::future::pending().await
    }
}
