//! Request and response types for completion calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use coach_core::Result;

/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a completion conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// A user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    /// An assistant-authored message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// A fully-specified completion request sent to one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Optional system prompt prepended to the conversation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// The conversation so far.
    pub messages: Vec<Message>,
    /// The model identifier to use.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Caller-facing options; the adapter fills in the model per attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    /// The preferred model; the fallback chain is tried after it.
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl CompletionOptions {
    /// Options for a single user prompt against the given model.
    pub fn prompt(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![Message::user(content)],
            model: model.into(),
            max_tokens: 1024,
            temperature: 0.7,
        }
    }

    pub(crate) fn to_request(&self, model: &str) -> CompletionRequest {
        CompletionRequest {
            system: self.system.clone(),
            messages: self.messages.clone(),
            model: model.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Token accounting reported by the completion service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// The outcome of one successful completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResult {
    /// The generated text.
    pub text: String,
    /// The model that actually produced the text (after fallback).
    pub model: String,
    /// Token accounting.
    pub usage: TokenUsage,
    /// Why generation stopped (`stop`, `length`, ...).
    pub finish_reason: String,
}

/// The external completion service transport.
///
/// Implementations report transient failures (timeouts, rate limits,
/// 5xx-class errors) as retryable completion errors and everything else as
/// terminal, so the adapter can retry and fall back correctly.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// A human-readable name for tracing.
    fn name(&self) -> &str;

    /// Execute one completion request against one model.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResult>;
}
