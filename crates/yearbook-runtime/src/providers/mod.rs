//! LLM Provider abstractions for yearbook-runtime.
//!
//! This module defines the trait every chat-completion backend implements,
//! the OpenAI-compatible implementation, and the lazily built handle the
//! generators share.
//!
//! ## Security
//!
//! All providers use the [`secrets`] module for credential handling.
//! See [`ApiCredential`] for the recommended patterns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

mod factory;
mod handle;
pub mod secrets;

#[cfg(feature = "openai")]
mod openai;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use handle::ProviderHandle;
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "openai")]
pub use openai::{OpenAiProvider, OpenAiProviderFactory, OPENAI_DEFAULT_BASE_URL};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "YEARBOOK_API_KEY";

/// Errors from LLM providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether retrying cannot help until the configuration changes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProviderError::NotConfigured(_) | ProviderError::AuthError)
    }
}

/// Named JSON Schema the response must conform to.
#[derive(Debug, Clone)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: JsonValue,
}

impl ResponseSchema {
    pub fn new(name: impl Into<String>, schema: JsonValue) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,

    /// Structured output constraint, if any
    pub response_schema: Option<ResponseSchema>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
            response_schema: None,
        }
    }
}

impl CompletionConfig {
    pub fn with_response_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

/// Inline binary attachment sent alongside a user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub mime_type: String,

    /// Base64 payload, without a data-URL prefix
    pub data: String,
}

impl Attachment {
    /// Render as a `data:` URL.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// File name announced with non-image uploads.
    pub fn file_name(&self) -> &'static str {
        match self.mime_type.as_str() {
            "application/pdf" => "document.pdf",
            _ => "document",
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system" or "user"
    pub role: String,

    /// Message content
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
            attachment: None,
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            attachment: None,
        }
    }

    /// Attach an inline file (image or document) to this message.
    pub fn with_attachment(mut self, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        self.attachment = Some(Attachment {
            mime_type: mime_type.into(),
            data: data.into(),
        });
        self
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Token usage
    pub usage: TokenUsage,

    /// Model used
    pub model: String,

    /// Stop reason
    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,
}

impl TokenUsage {
    /// Total tokens used.
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider abstraction allows swapping LLM backends.
///
/// The generators in this crate are the only callers; the deterministic
/// core never reaches a provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Check if provider is healthy.
    async fn health_check(&self) -> bool;

    /// Get provider name for metrics.
    fn name(&self) -> &str;

    /// Estimate tokens for a prompt.
    fn estimate_tokens(&self, text: &str) -> u32 {
        // CJK text runs close to one token per character
        text.chars().count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let system = ChatMessage::system("你是一位作家。");
        assert_eq!(system.role, "system");
        assert!(system.attachment.is_none());

        let user = ChatMessage::user("你好").with_attachment("image/png", "aGVsbG8=");
        assert_eq!(user.role, "user");
        assert_eq!(
            user.attachment.as_ref().map(Attachment::data_url).as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
    }

    #[test]
    fn test_attachment_kinds() {
        let image = ChatMessage::user("x").with_attachment("image/png", "AA==");
        let pdf = ChatMessage::user("x").with_attachment("application/pdf", "AA==");

        let image = image.attachment.unwrap();
        assert!(image.is_image());

        let pdf = pdf.attachment.unwrap();
        assert!(!pdf.is_image());
        assert_eq!(pdf.file_name(), "document.pdf");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn test_configuration_errors() {
        assert!(ProviderError::NotConfigured("missing key".into()).is_configuration());
        assert!(ProviderError::AuthError.is_configuration());
        assert!(!ProviderError::Timeout(Duration::from_secs(1)).is_configuration());
        assert!(!ProviderError::EmptyResponse.is_configuration());
    }

    #[test]
    fn test_token_estimate_counts_chars() {
        struct Dummy;

        #[async_trait]
        impl LlmProvider for Dummy {
            async fn complete(
                &self,
                _messages: Vec<ChatMessage>,
                _config: &CompletionConfig,
            ) -> Result<CompletionResponse, ProviderError> {
                Err(ProviderError::EmptyResponse)
            }

            async fn health_check(&self) -> bool {
                false
            }

            fn name(&self) -> &str {
                "dummy"
            }
        }

        assert_eq!(Dummy.estimate_tokens("今年去了大理"), 6);
    }
}
