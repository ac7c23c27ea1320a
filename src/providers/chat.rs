//! Raw chat-completions client over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{is_retryable, CompletionError, CompletionProvider};
use crate::config::ProviderConfig;

/// Hard cap on a single completion request.
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Retry budget for transient failures.
const MAX_RETRIES: u32 = 1;

/// Pause before the retry attempt.
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

/// Client for an OpenAI-style `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    /// Build a client from provider config. Fails fast when no API key is
    /// configured rather than letting every request 401.
    pub fn new(config: ProviderConfig) -> Result<Self, CompletionError> {
        if config.api_key.is_none() {
            return Err(CompletionError::NotConfigured(
                "no API key set (configure provider.api_key or ECOLENS_API_KEY)".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn request(&self, prompt: &str) -> Result<String, CompletionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| CompletionError::NotConfigured("no API key set".to_string()))?;

        let body = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [{ "type": "text", "text": prompt }],
            }],
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(CompletionError::MalformedResponse)
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let mut attempt = 0;
        loop {
            match self.request(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < MAX_RETRIES && is_retryable(&e) => {
                    attempt += 1;
                    tracing::warn!(error = %e, attempt, "retrying completion request");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_an_api_key() {
        let config = ProviderConfig::default();
        let result = ChatCompletionsClient::new(config);
        assert!(matches!(result, Err(CompletionError::NotConfigured(_))));
    }

    #[test]
    fn new_accepts_configured_key() {
        let mut config = ProviderConfig::default();
        config.api_key = Some("sk-test".to_string());
        assert!(ChatCompletionsClient::new(config).is_ok());
    }
}
