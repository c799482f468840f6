//! AI Provider Abstraction
//!
//! Defines the [`AiProvider`] contract and the closed set of backends that
//! implement it. Backends are addressed through [`ProviderKind`] and held in
//! the [`Provider`] enum, which delegates by matching on the variant.
//!
//! ## Modules
//!
//! - `chat`: OpenAI-style chat completions wire format shared by two backends
//! - `selector`: ordered availability probing across configured backends

mod chat;
mod gemini;
mod github_models;
mod openai;
mod selector;

pub use gemini::GeminiProvider;
pub use github_models::GitHubModelsProvider;
pub use openai::OpenAiCompatibleProvider;
pub use selector::{ProbeReport, ProviderSelector};

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::ai::credentials::CredentialKey;
use crate::ai::timeout::TimeoutConfig;
use crate::ai::validation::extract_json_from_response;
use crate::config::Config;
use crate::types::{BlogError, Result};

// =============================================================================
// Provider Kinds
// =============================================================================

/// Backends known to the selector, in their default priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Primary cloud LLM
    #[serde(rename = "gemini")]
    Gemini,
    /// LLM hosted by the code-hosting platform
    #[serde(rename = "github-models")]
    GitHubModels,
    /// Any endpoint speaking the OpenAI chat completions protocol
    #[serde(rename = "openai-compatible")]
    OpenAiCompatible,
}

impl ProviderKind {
    /// Stable identifier used for logging and selection
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::GitHubModels => "github-models",
            Self::OpenAiCompatible => "openai-compatible",
        }
    }

    /// Which credential unlocks this backend
    pub fn credential_key(&self) -> CredentialKey {
        match self {
            Self::Gemini => CredentialKey::Gemini,
            Self::GitHubModels => CredentialKey::GitHub,
            Self::OpenAiCompatible => CredentialKey::OpenAiCompatible,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

/// Per-backend request settings
///
/// Credentials are not part of this struct; they are resolved separately and
/// handed to the constructor.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Model name (backend-specific)
    pub model: String,
    /// API base URL
    pub api_base: String,
    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Settings for `kind` drawn from the application config
    pub fn for_kind(kind: ProviderKind, config: &Config) -> Self {
        let (model, api_base) = match kind {
            ProviderKind::Gemini => (&config.llm.gemini_model, &config.llm.gemini_api_base),
            ProviderKind::GitHubModels => (
                &config.llm.github_models_model,
                &config.llm.github_models_api_base,
            ),
            ProviderKind::OpenAiCompatible => (
                &config.llm.openai_compatible.model,
                &config.llm.openai_compatible.api_base,
            ),
        };

        Self {
            model: model.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            timeout: TimeoutConfig::from(&config.timeouts).llm_request,
        }
    }
}

// =============================================================================
// AI Provider Trait
// =============================================================================

/// Uniform contract implemented by every backend
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider name for logging and selection
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Whether the backend enforces JSON output natively
    ///
    /// When true, the extractor only acts as a safety net.
    fn supports_json_mode(&self) -> bool;

    /// Lightweight live probe. Never fails: any problem reads as `false`.
    async fn is_available(&self) -> bool;

    /// Generate free-form text
    async fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Generate structured output
    async fn generate_json(&self, prompt: &str) -> Result<Value>;
}

/// Decode a backend's answer, attaching the provider name on failure
///
/// `native_json` tells whether the backend was asked to force JSON output; if
/// not, the extractor is the primary decoder rather than a safety net.
pub(crate) fn decode_json(provider: &str, native_json: bool, text: &str) -> Result<Value> {
    match extract_json_from_response(text) {
        Ok(value) => {
            debug!(provider, native_json, "Decoded structured response");
            Ok(value)
        }
        Err(source) => {
            if native_json {
                warn!(provider, "JSON mode response was not valid JSON");
            }
            Err(BlogError::ProviderResponse {
                provider: provider.to_string(),
                source,
            })
        }
    }
}

/// Build the shared HTTP client for a backend
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(crate::constants::network::USER_AGENT)
        .build()
        .map_err(|e| BlogError::Config(format!("Failed to create HTTP client: {}", e)))
}

// =============================================================================
// Closed Provider Set
// =============================================================================

/// One constructed backend
#[derive(Debug)]
pub enum Provider {
    Gemini(GeminiProvider),
    GitHubModels(GitHubModelsProvider),
    OpenAiCompatible(OpenAiCompatibleProvider),
}

impl Provider {
    /// Construct a backend. Performs no network calls.
    pub fn build(
        kind: ProviderKind,
        credential: Option<SecretString>,
        config: ProviderConfig,
    ) -> Result<Self> {
        Ok(match kind {
            ProviderKind::Gemini => Self::Gemini(GeminiProvider::new(credential, config)?),
            ProviderKind::GitHubModels => {
                Self::GitHubModels(GitHubModelsProvider::new(credential, config)?)
            }
            ProviderKind::OpenAiCompatible => {
                Self::OpenAiCompatible(OpenAiCompatibleProvider::new(credential, config)?)
            }
        })
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Gemini(_) => ProviderKind::Gemini,
            Self::GitHubModels(_) => ProviderKind::GitHubModels,
            Self::OpenAiCompatible(_) => ProviderKind::OpenAiCompatible,
        }
    }
}

#[async_trait]
impl AiProvider for Provider {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::GitHubModels(p) => p.name(),
            Self::OpenAiCompatible(p) => p.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Gemini(p) => p.model(),
            Self::GitHubModels(p) => p.model(),
            Self::OpenAiCompatible(p) => p.model(),
        }
    }

    fn supports_json_mode(&self) -> bool {
        match self {
            Self::Gemini(p) => p.supports_json_mode(),
            Self::GitHubModels(p) => p.supports_json_mode(),
            Self::OpenAiCompatible(p) => p.supports_json_mode(),
        }
    }

    async fn is_available(&self) -> bool {
        match self {
            Self::Gemini(p) => p.is_available().await,
            Self::GitHubModels(p) => p.is_available().await,
            Self::OpenAiCompatible(p) => p.is_available().await,
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        match self {
            Self::Gemini(p) => p.generate_text(prompt).await,
            Self::GitHubModels(p) => p.generate_text(prompt).await,
            Self::OpenAiCompatible(p) => p.generate_text(prompt).await,
        }
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value> {
        match self {
            Self::Gemini(p) => p.generate_json(prompt).await,
            Self::GitHubModels(p) => p.generate_json(prompt).await,
            Self::OpenAiCompatible(p) => p.generate_json(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            ProviderKind::Gemini,
            ProviderKind::GitHubModels,
            ProviderKind::OpenAiCompatible,
        ] {
            let serialized = serde_json::to_string(&kind).unwrap();
            assert_eq!(serialized, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_provider_config_for_kind() {
        let mut config = Config::default();
        config.llm.openai_compatible.api_base = "http://localhost:8080/v1/".into();

        let gemini = ProviderConfig::for_kind(ProviderKind::Gemini, &config);
        assert_eq!(gemini.model, "gemini-2.5-flash");
        assert_eq!(gemini.max_tokens, 4000);

        let compat = ProviderConfig::for_kind(ProviderKind::OpenAiCompatible, &config);
        assert_eq!(compat.api_base, "http://localhost:8080/v1");
        assert_eq!(compat.model, "deepseek-chat");
    }

    #[test]
    fn test_build_dispatches_by_kind() {
        let config = Config::default();
        for kind in [
            ProviderKind::Gemini,
            ProviderKind::GitHubModels,
            ProviderKind::OpenAiCompatible,
        ] {
            let provider =
                Provider::build(kind, None, ProviderConfig::for_kind(kind, &config)).unwrap();
            assert_eq!(provider.kind(), kind);
            assert_eq!(provider.name(), kind.name());
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_unavailable_without_network() {
        let config = Config::default();
        let provider = Provider::build(
            ProviderKind::GitHubModels,
            None,
            ProviderConfig::for_kind(ProviderKind::GitHubModels, &config),
        )
        .unwrap();

        assert!(!provider.is_available().await);
        let err = provider.generate_text("hello").await.unwrap_err();
        assert!(matches!(err, BlogError::Provider(_)));
    }

    #[test]
    fn test_decode_json_native_and_extracted() {
        let fenced = "Here you go:\n```json\n{\"a\": 1}\n```";
        assert_eq!(decode_json("gemini", false, fenced).unwrap()["a"], 1);
        assert_eq!(decode_json("github-models", true, r#"{"a": 1}"#).unwrap()["a"], 1);
        assert!(decode_json("github-models", true, "").is_err());
    }

    #[test]
    fn test_decode_json_attaches_provider() {
        let err = decode_json("gemini", false, "no json here").unwrap_err();
        match err {
            BlogError::ProviderResponse { provider, source } => {
                assert_eq!(provider, "gemini");
                assert_eq!(source.raw, "no json here");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
