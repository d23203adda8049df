//! Error types for Socrates.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::types::Role;

/// Primary error type for all Socrates operations.
///
/// Every error is scoped to the turn that produced it; none leaves the
/// conversation in a partially applied state.
#[derive(Error, Debug)]
pub enum SocratesError {
    #[error("Invalid role: {0} messages can only be set by a reset")]
    InvalidRole(Role),

    #[error("Busy: a turn is already awaiting completion")]
    Busy,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Provider error: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SocratesError {
    /// Create a provider error carrying the HTTP status it was derived from.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::Provider {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create a provider error for a response that could not be interpreted.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Provider {
            status: None,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRole(_) | Self::Busy | Self::InvalidArgument(_) => ErrorCategory::Usage,
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether a caller could reasonably retry the turn.
    ///
    /// Advisory only: the dialogue core never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Provider {
                status: Some(status),
                ..
            } => (500..=599).contains(status),
            _ => matches!(
                self.category(),
                ErrorCategory::RateLimit | ErrorCategory::Transport | ErrorCategory::Timeout
            ),
        }
    }

    /// Programming or usage errors raised synchronously by the core itself.
    pub fn is_usage_error(&self) -> bool {
        self.category() == ErrorCategory::Usage
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit | ErrorCategory::Transport => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Provider if self.is_retryable() => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Usage => RecoverySuggestion::CheckUsage,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SocratesError>;
