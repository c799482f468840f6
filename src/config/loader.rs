//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/autoblog/config.toml)
//! 3. Project config (.autoblog/config.toml)
//! 4. Environment variables (AUTOBLOG_* prefix, `__` between nesting levels)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{BlogError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_layers(
            Self::global_config_path().as_deref(),
            &Self::project_config_path(),
            true,
        )
    }

    /// Load from explicit global/project files, optionally merging env vars
    pub fn load_layers(global: Option<&Path>, project: &Path, with_env: bool) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(global_path));
        }

        if project.exists() {
            debug!("Loading project config from: {}", project.display());
            figment = figment.merge(Toml::file(project));
        }

        // e.g. AUTOBLOG_PUBLISH__MAX_ATTEMPTS -> publish.max_attempts
        if with_env {
            figment = figment.merge(Env::prefixed("AUTOBLOG_").split("__"));
        }

        let config: Config = figment
            .extract()
            .map_err(|e| BlogError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| BlogError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (~/.config/autoblog/ on Linux)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "autoblog").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_dir() -> PathBuf {
        PathBuf::from(".autoblog")
    }

    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join("config.toml")
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a starter config file; returns the path written
    pub fn init(global: bool, force: bool) -> Result<PathBuf> {
        let dir = if global {
            Self::global_dir().ok_or_else(|| {
                BlogError::Config("Cannot determine global config directory".to_string())
            })?
        } else {
            Self::project_dir()
        };
        Self::init_in(&dir, force)
    }

    pub fn init_in(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config_template())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    fn default_config_template() -> &'static str {
        r#"# Autoblog Configuration
# Credentials are never stored here: set GEMINI_API_KEY, GITHUB_TOKEN,
# DEEPSEEK_API_KEY, or point [secrets].dir at a directory of secret files.

version = "1.0"

[llm]
priority = ["gemini", "github-models", "openai-compatible"]
temperature = 0.7
max_tokens = 4000

[llm.openai_compatible]
enabled = false
api_base = "https://api.deepseek.com/v1"
model = "deepseek-chat"

[publish]
owner = ""
repo = ""
blog_path = "blog"
local_root = "."
max_attempts = 2
retry_delay_ms = 1000

[timeouts]
llm_request_secs = 120
probe_secs = 20
repository_secs = 30
"#
    }
}
