// src/llm.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::models::chat::ChatTurn;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request to AI provider failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("AI provider returned no content")]
    EmptyResponse,
}

/// Seam over the chat-completion providers. The orchestrator and the
/// summarize route only ever see this trait, so tests can swap in a mock
/// and the configured provider is chosen once at startup.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full ordered history and return the assistant reply text.
    /// Exactly one attempt; no retries.
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, LlmError>;
}
