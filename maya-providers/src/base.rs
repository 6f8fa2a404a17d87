//! Base trait for chat-completion providers

use async_trait::async_trait;
use maya_core::session::Message;
use std::collections::HashMap;
use thiserror::Error;

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A completed assistant response
#[derive(Debug, Clone)]
pub struct Completion {
    /// Assistant reply text
    pub content: String,
    /// Reason the model stopped
    pub finish_reason: String,
    /// Token usage counters reported by the provider
    pub usage: HashMap<String, i64>,
}

/// Trait for chat-completion providers.
///
/// Implementations submit the ordered message context and return a single
/// assistant message. Errors (network, auth, rate limit) surface unchanged;
/// retry policy belongs to the caller.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat completion request
    async fn complete(
        &self,
        messages: &[Message],
        model: Option<&str>,
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<Completion>;

    /// Get the default model for this provider
    fn default_model(&self) -> String;
}
