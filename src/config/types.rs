//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/autoblog/) and project (.autoblog/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::ai::provider::ProviderKind;
use crate::constants::{backends, generation, network, publish};
use crate::types::{BlogError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// AI backend settings
    pub llm: LlmConfig,

    /// Repository publishing settings
    pub publish: PublishConfig,

    /// Secret store settings
    pub secrets: SecretsConfig,

    /// Request deadlines
    pub timeouts: TimeoutsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            publish: PublishConfig::default(),
            secrets: SecretsConfig::default(),
            timeouts: TimeoutsConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `BlogError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(BlogError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.max_tokens == 0 {
            return Err(BlogError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.llm.priority.is_empty() {
            return Err(BlogError::Config(
                "LLM priority must name at least one backend".to_string(),
            ));
        }

        if self.publish.max_attempts == 0 {
            return Err(BlogError::Config(
                "Publish max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.publish.blog_path.trim_matches('/').is_empty() {
            return Err(BlogError::Config(
                "Publish blog_path must not be empty".to_string(),
            ));
        }

        let endpoints = [
            ("llm.gemini_api_base", self.llm.gemini_api_base.as_str()),
            ("llm.github_models_api_base", self.llm.github_models_api_base.as_str()),
            ("llm.openai_compatible.api_base", self.llm.openai_compatible.api_base.as_str()),
            ("publish.api_base", self.publish.api_base.as_str()),
        ];
        for (key, value) in endpoints
            .into_iter()
            .chain(self.publish.site_url.as_deref().map(|url| ("publish.site_url", url)))
        {
            Url::parse(value)
                .map_err(|e| BlogError::Config(format!("Invalid URL for {}: {} ({})", key, value, e)))?;
        }

        if self.timeouts.llm_request_secs == 0
            || self.timeouts.probe_secs == 0
            || self.timeouts.repository_secs == 0
        {
            return Err(BlogError::Config(
                "Timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Backends in declared priority order, with disabled optional ones removed
    pub fn provider_order(&self) -> Vec<ProviderKind> {
        let mut order = Vec::with_capacity(self.llm.priority.len());
        for kind in &self.llm.priority {
            if *kind == ProviderKind::OpenAiCompatible && !self.llm.openai_compatible.enabled {
                continue;
            }
            if !order.contains(kind) {
                order.push(*kind);
            }
        }
        order
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backends in the order they are probed
    pub priority: Vec<ProviderKind>,

    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,

    /// Maximum tokens to generate per request
    pub max_tokens: u32,

    /// Gemini model name
    pub gemini_model: String,

    /// Gemini API base URL
    pub gemini_api_base: String,

    /// GitHub Models model name
    pub github_models_model: String,

    /// GitHub Models inference endpoint
    pub github_models_api_base: String,

    /// Optional OpenAI-compatible backend
    pub openai_compatible: OpenAiCompatibleConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            priority: vec![
                ProviderKind::Gemini,
                ProviderKind::GitHubModels,
                ProviderKind::OpenAiCompatible,
            ],
            temperature: generation::DEFAULT_TEMPERATURE,
            max_tokens: generation::DEFAULT_MAX_TOKENS,
            gemini_model: backends::GEMINI_MODEL.to_string(),
            gemini_api_base: backends::GEMINI_API_BASE.to_string(),
            github_models_model: backends::GITHUB_MODELS_MODEL.to_string(),
            github_models_api_base: backends::GITHUB_MODELS_API_BASE.to_string(),
            openai_compatible: OpenAiCompatibleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiCompatibleConfig {
    /// Appended to the selection order only when enabled
    pub enabled: bool,
    pub api_base: String,
    pub model: String,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: backends::OPENAI_COMPATIBLE_API_BASE.to_string(),
            model: backends::OPENAI_COMPATIBLE_MODEL.to_string(),
        }
    }
}

// =============================================================================
// Publish Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Repository owner (user or organization)
    pub owner: String,

    /// Repository name
    pub repo: String,

    /// Directory inside the repository (and under `local_root`) for posts
    pub blog_path: String,

    /// Root directory for local saves
    pub local_root: PathBuf,

    /// Direct-commit attempts before opening a pull request
    pub max_attempts: u32,

    /// Linear backoff unit between direct-commit attempts
    pub retry_delay_ms: u64,

    /// Front-matter author
    pub author: String,

    /// Front-matter tags
    pub tags: Vec<String>,

    /// Commit identity
    pub committer_name: String,
    pub committer_email: String,

    /// Prefix for pull-request branches
    pub branch_prefix: String,

    /// Repository host API base URL
    pub api_base: String,

    /// Public site URL; posts are linked as `{site_url}/{blog_path}/{slug}`
    pub site_url: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            blog_path: publish::DEFAULT_BLOG_PATH.to_string(),
            local_root: PathBuf::from("."),
            max_attempts: publish::DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: publish::DEFAULT_RETRY_DELAY_MS,
            author: publish::DEFAULT_AUTHOR.to_string(),
            tags: vec![
                "AI".to_string(),
                "Enterprise".to_string(),
                "Automation".to_string(),
            ],
            committer_name: publish::DEFAULT_COMMITTER_NAME.to_string(),
            committer_email: publish::DEFAULT_COMMITTER_EMAIL.to_string(),
            branch_prefix: publish::DEFAULT_BRANCH_PREFIX.to_string(),
            api_base: publish::GITHUB_API_BASE.to_string(),
            site_url: None,
        }
    }
}

impl PublishConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Whether a remote repository target is configured at all
    pub fn has_repository(&self) -> bool {
        !self.owner.is_empty() && !self.repo.is_empty()
    }
}

// =============================================================================
// Secrets & Timeouts
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    /// Directory holding one file per secret, named after the secret
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutsConfig {
    pub llm_request_secs: u64,
    pub probe_secs: u64,
    pub repository_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            llm_request_secs: network::LLM_REQUEST_TIMEOUT_SECS,
            probe_secs: network::PROBE_TIMEOUT_SECS,
            repository_secs: network::REPOSITORY_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.publish.max_attempts, 2);
        assert_eq!(config.publish.blog_path, "blog");
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.5;
        assert!(matches!(config.validate(), Err(BlogError::Config(_))));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = Config::default();
        config.publish.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provider_order_skips_disabled_optional_backend() {
        let config = Config::default();
        assert_eq!(
            config.provider_order(),
            vec![ProviderKind::Gemini, ProviderKind::GitHubModels]
        );

        let mut enabled = Config::default();
        enabled.llm.openai_compatible.enabled = true;
        assert_eq!(
            enabled.provider_order(),
            vec![
                ProviderKind::Gemini,
                ProviderKind::GitHubModels,
                ProviderKind::OpenAiCompatible
            ]
        );
    }

    #[test]
    fn test_provider_order_dedupes() {
        let mut config = Config::default();
        config.llm.priority = vec![
            ProviderKind::GitHubModels,
            ProviderKind::Gemini,
            ProviderKind::GitHubModels,
        ];
        assert_eq!(
            config.provider_order(),
            vec![ProviderKind::GitHubModels, ProviderKind::Gemini]
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let mut config = Config::default();
        config.llm.openai_compatible.api_base = "not a url".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.openai_compatible.api_base"));

        let mut config = Config::default();
        config.publish.site_url = Some("https://blog.example.com".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_has_repository() {
        let mut config = PublishConfig::default();
        assert!(!config.has_repository());
        config.owner = "acme".into();
        config.repo = "site".into();
        assert!(config.has_repository());
    }
}
