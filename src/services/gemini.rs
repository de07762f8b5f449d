// src/services/gemini.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::generator::{GenerateError, Generator, Role, Turn};

// Request body for models/{model}:generateContent.
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    status: Option<String>,
}

/// Google Generative Language API client.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn build_request(transcript: &[Turn]) -> GenerateContentRequest<'_> {
    let contents = transcript
        .iter()
        .map(|turn| Content {
            role: match turn.role {
                Role::User => "user",
                Role::Model => "model",
            },
            parts: [Part { text: &turn.text }],
        })
        .collect();
    GenerateContentRequest { contents }
}

// Concatenated text of the first candidate, or None when there is nothing usable.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

fn parse_error(status: u16, body: &str) -> GenerateError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => GenerateError::from_status(
            status,
            envelope.error.status.as_deref(),
            envelope.error.message,
        ),
        Err(_) => GenerateError::from_status(status, None, format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, transcript: &[Turn]) -> Result<Option<String>, GenerateError> {
        debug!(model = %self.model, turns = transcript.len(), "calling generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(transcript))
            .send()
            .await
            .map_err(|e| GenerateError::classify(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &body));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::classify(format!("Failed to parse response: {}", e)))?;

        Ok(extract_text(body))
    }
}
