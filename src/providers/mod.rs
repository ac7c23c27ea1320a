//! CompletionProvider trait and the chat-completions client.
//!
//! The trait decouples the pipeline from the concrete HTTP client so tests
//! can substitute canned or failing providers.

pub mod chat;

use async_trait::async_trait;
use thiserror::Error;

pub use chat::ChatCompletionsClient;

/// Errors from a completion provider.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion request timed out")]
    Timeout,

    #[error("completion response had no message content")]
    MalformedResponse,

    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

/// Trait for single-turn LLM completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one prompt, return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Whether a failed request is worth retrying. Timeouts, connection
/// failures, rate limits, and server errors are transient; other HTTP
/// statuses (auth, bad request) are terminal.
pub fn is_retryable(error: &CompletionError) -> bool {
    match error {
        CompletionError::Timeout | CompletionError::Transport(_) => true,
        CompletionError::Http { status, .. } => *status == 429 || (500..=599).contains(status),
        CompletionError::MalformedResponse | CompletionError::NotConfigured(_) => false,
    }
}
