//! Completion provider boundary
//!
//! Message types and the [`CompletionProvider`] trait that the orchestrator
//! consumes. Implementors handle authentication, request formatting, and
//! response parsing for a specific completion API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod providers;

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to a completion provider
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Ordered messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    /// Create a request from an assembled message sequence
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Response from a completion provider
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated assistant text
    pub content: String,

    /// Token usage, for observability only
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Trait for completion provider implementations.
///
/// The orchestrator depends on this contract alone; production systems plug in
/// a hosted API client, tests plug in a scripted stub. Transport failures,
/// timeouts, and malformed or empty payloads must all surface as
/// [`DialogosError::CompletionProvider`](crate::error::DialogosError).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion over the given message sequence.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse>;

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::system("persona");
        assert_eq!(msg.role, MessageRole::System);
        assert_eq!(msg.content, "persona");

        assert_eq!(Message::user("hi").role, MessageRole::User);
        assert_eq!(Message::assistant("hello").role, MessageRole::Assistant);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new(vec![Message::user("hi")])
            .with_temperature(0.8)
            .with_max_tokens(500);

        assert_eq!(request.temperature, Some(0.8));
        assert_eq!(request.max_tokens, Some(500));
    }

    #[test]
    fn test_temperature_clamping() {
        let request = CompletionRequest::new(Vec::new()).with_temperature(5.0);
        assert_eq!(request.temperature, Some(2.0));

        let request = CompletionRequest::new(Vec::new()).with_temperature(-1.0);
        assert_eq!(request.temperature, Some(0.0));
    }
}
