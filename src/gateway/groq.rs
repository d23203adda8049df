//! Groq gateway (OpenAI-compatible).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SocratesError;
use crate::types::{Completion, CompletionRequest};

use super::openai::OpenAiGateway;
use super::CompletionGateway;

pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqGateway {
    inner: OpenAiGateway,
}

impl GroqGateway {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self::with_base_url(api_key, GROQ_BASE_URL, timeout)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            inner: OpenAiGateway::named("groq", api_key, base_url, timeout),
        }
    }
}

#[async_trait]
impl CompletionGateway for GroqGateway {
    fn provider_name(&self) -> &str { self.inner.provider_name() }
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, SocratesError> {
        self.inner.complete(request).await
    }
}
