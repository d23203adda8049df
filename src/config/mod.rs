//! Configuration system (layered: defaults < TOML file < env < explicit overrides).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Result, SocratesError};
use crate::types::{CompletionSettings, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Default per-turn completion timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Hosted provider behind the completion gateway.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ProviderKind {
    #[default]
    Groq,
    #[strum(serialize = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    #[strum(serialize = "openai-compatible")]
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
}

impl ProviderKind {
    /// Environment variable holding this provider's API key.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::OpenAiCompatible => "OPENAI_COMPAT_API_KEY",
        }
    }
}

/// Resolved configuration for a Socrates session.
#[derive(Clone, PartialEq)]
pub struct SocratesConfig {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl fmt::Debug for SocratesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocratesConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SocratesConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// On-disk layout of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    provider: Option<ProviderKind>,
    model: Option<String>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
    api_key: Option<String>,
    groq: Option<ProviderTable>,
    openai: Option<ProviderTable>,
    #[serde(rename = "openai-compatible")]
    openai_compatible: Option<ProviderTable>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderTable {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl FileConfig {
    fn table(&self, provider: ProviderKind) -> Option<&ProviderTable> {
        match provider {
            ProviderKind::Groq => self.groq.as_ref(),
            ProviderKind::OpenAi => self.openai.as_ref(),
            ProviderKind::OpenAiCompatible => self.openai_compatible.as_ref(),
        }
    }
}

impl SocratesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file (`<config dir>/socrates/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "socrates")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Full layered load: defaults, then the TOML file, then the environment,
    /// then [`validate`](Self::validate).
    ///
    /// With `path = None` the default location is used and a missing file is
    /// fine; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_for(path, None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file and environment layers with the provider pinned by the
    /// caller, so the matching key table and key variable are used.
    ///
    /// Does not validate: callers layer their own overrides on top and then
    /// call [`validate`](Self::validate).
    pub fn load_for(path: Option<&Path>, provider: Option<ProviderKind>) -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error

        let raw = match path {
            Some(p) => Some(read_config_file(p)?),
            None => match Self::default_path() {
                Some(p) if p.exists() => Some(read_config_file(&p)?),
                _ => None,
            },
        };

        // Provider must be settled before the key table is picked.
        let provider = match provider {
            Some(p) => Some(p),
            None => env_provider()?,
        };
        let mut config = match raw {
            Some(raw) => Self::parse_toml(&raw, provider)?,
            None => Self::default(),
        };
        if let Some(provider) = provider {
            config.provider = provider;
        }
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults overlaid with a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_toml_str(&read_config_file(path)?)
    }

    /// Defaults overlaid with TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Self::parse_toml(raw, None)
    }

    fn parse_toml(raw: &str, provider: Option<ProviderKind>) -> Result<Self> {
        let file: FileConfig = toml::from_str(raw)
            .map_err(|e| SocratesError::Configuration(format!("invalid config file: {e}")))?;

        let mut config = Self::default();
        if let Some(provider) = provider.or(file.provider) {
            config.provider = provider;
        }
        if let Some(model) = file.model.clone() {
            config.model = model;
        }
        if let Some(max_tokens) = file.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(secs) = file.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }

        // Provider table wins over the top-level keys.
        let table = file.table(config.provider);
        config.api_key = table
            .and_then(|t| t.api_key.clone())
            .or_else(|| file.api_key.clone());
        config.base_url = table
            .and_then(|t| t.base_url.clone())
            .or_else(|| file.base_url.clone());

        Ok(config)
    }

    /// Overlay `SOCRATES_*` variables and the provider's key variable.
    ///
    /// The provider itself is chosen before this runs (see [`load_for`](Self::load_for)).
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(model) = std::env::var("SOCRATES_MODEL") {
            self.model = model;
        }
        if let Ok(raw) = std::env::var("SOCRATES_MAX_TOKENS") {
            self.max_tokens = parse_env_number("SOCRATES_MAX_TOKENS", &raw)?;
        }
        if let Ok(raw) = std::env::var("SOCRATES_TIMEOUT_SECS") {
            self.timeout = Duration::from_secs(parse_env_number("SOCRATES_TIMEOUT_SECS", &raw)?);
        }
        if let Ok(url) = std::env::var("SOCRATES_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Ok(key) = std::env::var(self.provider.api_key_env()) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        Ok(())
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject settings no turn could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SocratesError::Configuration("model must not be empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(SocratesError::Configuration(
                "max_tokens must be greater than zero".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(SocratesError::Configuration(
                "timeout must be greater than zero".into(),
            ));
        }
        if self.provider == ProviderKind::OpenAiCompatible && self.base_url.is_none() {
            return Err(SocratesError::Configuration(
                "openai-compatible provider requires a base_url".into(),
            ));
        }
        Ok(())
    }

    /// Settings attached to every completion request.
    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings::builder()
            .model_id(self.model.clone())
            .max_tokens(self.max_tokens)
            .build()
    }
}

fn env_provider() -> Result<Option<ProviderKind>> {
    match std::env::var("SOCRATES_PROVIDER") {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SocratesError::Configuration(format!("unknown provider '{raw}'"))),
        Err(_) => Ok(None),
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        SocratesError::Configuration(format!("cannot read {}: {e}", path.display()))
    })
}

fn parse_env_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| SocratesError::Configuration(format!("{name} must be a number, got '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_hosted_setup() {
        let config = SocratesConfig::default();
        assert_eq!(config.provider, ProviderKind::Groq);
        assert_eq!(config.model, "llama-3.1-70b-versatile");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn provider_table_key_beats_top_level_key() {
        let config = SocratesConfig::from_toml_str(
            r#"
            api_key = "top-level"

            [groq]
            api_key = "gsk-table"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("gsk-table"));
    }

    #[test]
    fn table_for_other_provider_is_ignored() {
        let config = SocratesConfig::from_toml_str(
            r#"
            provider = "openai"

            [groq]
            api_key = "gsk-unused"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn malformed_toml_is_a_configuration_error() {
        let err = SocratesConfig::from_toml_str("max_tokens = \"lots\"").unwrap_err();
        assert!(matches!(err, SocratesError::Configuration(_)));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        assert!(SocratesConfig::new().with_max_tokens(0).validate().is_err());
        assert!(SocratesConfig::new()
            .with_timeout(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn compatible_provider_needs_base_url() {
        let config = SocratesConfig::new().with_provider(ProviderKind::OpenAiCompatible);
        assert!(matches!(
            config.validate(),
            Err(SocratesError::Configuration(_))
        ));
        assert!(config
            .with_base_url("http://localhost:8080/v1")
            .validate()
            .is_ok());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = SocratesConfig::new().with_api_key("gsk-very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("GROQ".parse::<ProviderKind>().unwrap(), ProviderKind::Groq);
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "openai-compatible".parse::<ProviderKind>().unwrap(),
            ProviderKind::OpenAiCompatible
        );
        assert_eq!(ProviderKind::OpenAi.to_string(), "openai");
    }
}
