//! Completion provider port
//!
//! Defines the interface for requesting chat completions from an LLM provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swarm_domain::Model;
use thiserror::Error;

/// Errors that can occur during a completion request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Provider server error (HTTP {status})")]
    Server { status: u16 },

    #[error("Request timed out")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
}

impl ProviderError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. }
                | ProviderError::Server { .. }
                | ProviderError::Timeout
                | ProviderError::Connection(_)
        )
    }

    /// Delay requested by the provider before the next attempt.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// An image sent alongside a user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/png`
    pub media_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImageAttachment {
    pub fn new(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// `data:` URL form accepted by OpenAI-compatible APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// One message of a chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub image: Option<ImageAttachment>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            image: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Option<ImageAttachment>) -> Self {
        self.image = image;
        self
    }
}

/// A chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: Model,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl Usage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A completed response
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub usage: Usage,
    pub latency_ms: u64,
}

/// Provider of chat completions
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Request a single completion
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ProviderError>;
}
