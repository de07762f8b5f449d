// src/services/conversation.rs
use thiserror::Error;
use tracing::warn;

use super::generator::{ErrorKind, GenerateError, Generator, Turn};

pub const INVALID_INPUT_REPLY: &str = "Please provide a valid input.";
pub const EMPTY_OUTPUT_REPLY: &str =
    "I apologize, but I couldn't generate a response. Please try again.";
pub const AUTH_ERROR_REPLY: &str =
    "Error: Invalid or missing API key. Please check your configuration.";
pub const RATE_LIMIT_REPLY: &str = "Error: Rate limit exceeded. Please try again in a moment.";

#[derive(Debug, Error)]
pub enum SendError {
    #[error("input is empty")]
    EmptyInput,
    #[error("generator returned no text")]
    EmptyOutput,
    #[error(transparent)]
    Upstream(#[from] GenerateError),
}

impl SendError {
    /// The user-facing text returned in place of this error.
    pub fn reply(&self) -> String {
        match self {
            SendError::EmptyInput => INVALID_INPUT_REPLY.to_string(),
            SendError::EmptyOutput => EMPTY_OUTPUT_REPLY.to_string(),
            SendError::Upstream(e) => match e.kind {
                ErrorKind::Auth => AUTH_ERROR_REPLY.to_string(),
                ErrorKind::RateLimit => RATE_LIMIT_REPLY.to_string(),
                ErrorKind::Other => format!("An unexpected error occurred: {}", e.message),
            },
        }
    }
}

/// Ordered transcript of one chat.
#[derive(Clone, Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `text` with the whole transcript as context.
    ///
    /// The user turn and the model turn are committed together, so a failed
    /// call leaves the transcript as it was.
    pub async fn try_send<G>(&mut self, generator: &G, text: &str) -> Result<String, SendError>
    where
        G: Generator + ?Sized,
    {
        if text.trim().is_empty() {
            return Err(SendError::EmptyInput);
        }

        // Nothing is written until the reply is in hand, so a panic or a
        // dropped future cannot leave a dangling user turn.
        let mut context = self.turns.clone();
        context.push(Turn::user(text));

        let result = generator.generate(&context).await;
        match result {
            Ok(Some(reply)) if !reply.trim().is_empty() => {
                context.push(Turn::model(reply.clone()));
                self.turns = context;
                Ok(reply)
            }
            Ok(_) => Err(SendError::EmptyOutput),
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Conversation::try_send`], but failures come back as reply text.
    pub async fn send<G>(&mut self, generator: &G, text: &str) -> String
    where
        G: Generator + ?Sized,
    {
        match self.try_send(generator, text).await {
            Ok(reply) => reply,
            Err(e) => {
                if let SendError::Upstream(ref upstream) = e {
                    warn!(kind = %upstream.kind, error = %upstream.message, "generation failed");
                }
                e.reply()
            }
        }
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
