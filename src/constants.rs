//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Generation defaults shared by every backend
pub mod generation {
    /// Sampling temperature for content generation
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;

    /// Upper bound on generated tokens per request
    pub const DEFAULT_MAX_TOKENS: u32 = 4000;

    /// Prompt used by generation-based availability probes
    pub const PROBE_PROMPT: &str = "Say \"OK\" if you can read this.";

    /// Token bound for availability probes
    pub const PROBE_MAX_TOKENS: u32 = 10;
}

/// Backend endpoints and default models
pub mod backends {
    pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

    pub const GITHUB_MODELS_API_BASE: &str = "https://models.inference.ai.azure.com";
    pub const GITHUB_MODELS_MODEL: &str = "gpt-4o-mini";

    pub const OPENAI_COMPATIBLE_API_BASE: &str = "https://api.deepseek.com/v1";
    pub const OPENAI_COMPATIBLE_MODEL: &str = "deepseek-chat";
}

/// Publish pipeline constants
pub mod publish {
    /// Direct-commit attempts before falling through to a pull request
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

    /// Fixed delay multiplied by the attempt index between direct commits (milliseconds)
    pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

    pub const GITHUB_API_BASE: &str = "https://api.github.com";

    pub const DEFAULT_BLOG_PATH: &str = "blog";
    pub const DEFAULT_AUTHOR: &str = "Autoblog";
    pub const DEFAULT_COMMITTER_NAME: &str = "Autoblog";
    pub const DEFAULT_COMMITTER_EMAIL: &str = "autoblog@users.noreply.github.com";
    pub const DEFAULT_BRANCH_PREFIX: &str = "autoblog";

    /// Title used when the generated markdown has no top-level heading
    pub const UNTITLED_POST: &str = "Untitled Post";
}

/// Network timeouts
pub mod network {
    /// AI backend request timeout (seconds)
    pub const LLM_REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Availability probe deadline (seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 20;

    /// Repository host request timeout (seconds)
    pub const REPOSITORY_TIMEOUT_SECS: u64 = 30;

    /// User agent sent to every remote API
    pub const USER_AGENT: &str = concat!("autoblog/", env!("CARGO_PKG_VERSION"));
}
