//! Completion gateway trait and implementations.

pub mod groq;
pub mod http;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{ProviderKind, SocratesConfig};
use crate::error::SocratesError;
use crate::types::{Completion, CompletionRequest, Role};

/// Boundary to a hosted chat-completion API.
///
/// One blocking request/response per turn: the whole history goes out, one
/// assistant message comes back. Implementations never retry.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Provider name (e.g., "groq", "openai").
    fn provider_name(&self) -> &str;

    /// Generate the next assistant message for `request.messages`.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, SocratesError>;
}

/// Enforce the gateway precondition: non-empty history led by the system message.
pub fn check_request(request: &CompletionRequest) -> Result<(), SocratesError> {
    match request.messages.first() {
        None => Err(SocratesError::InvalidArgument(
            "completion history must not be empty".into(),
        )),
        Some(first) if first.role != Role::System => Err(SocratesError::InvalidArgument(format!(
            "completion history must start with a system message, found {}",
            first.role
        ))),
        Some(_) => Ok(()),
    }
}

/// Create the gateway selected by `config.provider`.
pub fn create_gateway(
    config: &SocratesConfig,
) -> Result<Arc<dyn CompletionGateway>, SocratesError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            SocratesError::Authentication(format!("Missing {}", config.provider.api_key_env()))
        })?;

    match config.provider {
        ProviderKind::Groq => Ok(Arc::new(match config.base_url.clone() {
            Some(url) => groq::GroqGateway::with_base_url(api_key, url, config.timeout),
            None => groq::GroqGateway::new(api_key, config.timeout),
        })),
        ProviderKind::OpenAi => Ok(Arc::new(openai::OpenAiGateway::new(
            api_key,
            config.base_url.clone(),
            config.timeout,
        ))),
        ProviderKind::OpenAiCompatible => {
            let base_url = config.base_url.clone().ok_or_else(|| {
                SocratesError::Configuration("Missing SOCRATES_BASE_URL".into())
            })?;
            Ok(Arc::new(openai::OpenAiGateway::named(
                "openai-compatible",
                api_key,
                base_url,
                config.timeout,
            )))
        }
    }
}
