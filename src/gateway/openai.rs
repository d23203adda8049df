//! OpenAI-compatible Chat Completions gateway.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::SocratesError;
use crate::types::*;

use super::http::{bearer_headers, shared_client, status_to_error, transport_error};
use super::{check_request, CompletionGateway};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Talks to any endpoint that implements `POST {base_url}/chat/completions`.
pub struct OpenAiGateway {
    provider_name: String,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiGateway {
    pub fn new(api_key: String, base_url: Option<String>, timeout: Duration) -> Self {
        Self::named(
            "openai",
            api_key,
            base_url.unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            timeout,
        )
    }

    /// Same wire protocol under another provider's name and base URL.
    pub fn named(
        provider_name: impl Into<String>,
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.as_str(), "content": m.content }))
            .collect::<Vec<_>>();

        serde_json::json!({
            "model": request.model_id(),
            "messages": messages,
            "max_tokens": request.max_tokens(),
        })
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, SocratesError> {
        check_request(request)?;

        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(
            provider = %self.provider_name,
            model = request.model_id(),
            messages = request.messages.len(),
            "chat completion request"
        );

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body_text = resp
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        if !status.is_success() {
            return Err(status_to_error(status.as_u16(), &headers, &body_text));
        }

        let data: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| SocratesError::malformed(format!("unreadable completion body: {e}")))?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SocratesError::malformed("no choices in completion response"))?;
        let text = choice
            .message
            .content
            .ok_or_else(|| SocratesError::malformed("completion choice has no content"))?;

        Ok(Completion {
            message: Message::assistant(text),
            usage: data
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
            finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
        })
    }
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

// Chat Completions response types (internal)

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
