//! Completion request/response types exchanged with a gateway.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Message, Usage};

/// Default model served by the Groq gateway.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Default cap on generated tokens per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Per-turn settings sent alongside the history.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionSettings {
    #[builder(into, default = DEFAULT_MODEL.to_string())]
    pub model_id: String,
    #[builder(default = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A single request to a completion gateway.
///
/// `messages` is the literal prompt context: ordered, system message first.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub settings: CompletionSettings,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>, settings: CompletionSettings) -> Self {
        Self { messages, settings }
    }

    pub fn model_id(&self) -> &str {
        &self.settings.model_id
    }

    pub fn max_tokens(&self) -> u32 {
        self.settings.max_tokens
    }
}

/// The result of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Always has role `assistant`.
    pub message: Message,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text),
            usage: Usage::default(),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
}
