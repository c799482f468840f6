//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration, credentials,
//! provider selection and the publish pipeline.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::ai::credentials::{CredentialKey, CredentialSource, EnvThenSecretStore};
use crate::ai::provider::ProviderSelector;
use crate::ai::timeout::TimeoutConfig;
use crate::config::{Config, ConfigLoader};
use crate::publish::{GitHubHost, PublishPipeline};
use crate::types::Result;

/// Command execution context
pub struct CommandContext {
    pub config: Config,
    pub credentials: Arc<dyn CredentialSource>,
}

impl CommandContext {
    /// Load config (an explicit file replaces the layered lookup) and the
    /// default credential source
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        let credentials = Arc::new(EnvThenSecretStore::new(config.secrets.dir.clone()));

        Ok(Self {
            config,
            credentials,
        })
    }

    pub fn selector(&self) -> ProviderSelector {
        ProviderSelector::new(self.config.clone(), Arc::clone(&self.credentials))
    }

    /// Pipeline with a GitHub host when both a repository and a token are present
    pub fn pipeline(&self) -> Result<PublishPipeline<GitHubHost>> {
        let publish = &self.config.publish;

        let host = match self.credentials.resolve(CredentialKey::GitHub) {
            Some(token) if publish.has_repository() => Some(GitHubHost::new(
                token,
                publish,
                TimeoutConfig::from(&self.config.timeouts).repository,
            )?),
            Some(_) => {
                warn!("publish.owner/publish.repo not configured; posts will be saved locally");
                None
            }
            None => {
                warn!("GitHub token not found; posts will be saved locally");
                None
            }
        };

        Ok(PublishPipeline::new(host, publish.clone()))
    }
}
