pub mod models;
pub mod ollama;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use models::{Message, ModelInfo};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Operation not supported by this provider")]
    Unsupported,
}

/// Contract for the external inference daemon. One blocking call per
/// request; no streaming, no cancellation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn is_running(&self) -> bool;

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError>;

    /// Single-prompt completion.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, LlmError>;

    /// Multi-turn completion over a full message history. Providers that
    /// cannot do this return `LlmError::Unsupported` and the caller falls
    /// back to `generate`.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        timeout: Duration,
    ) -> Result<String, LlmError>;
}
