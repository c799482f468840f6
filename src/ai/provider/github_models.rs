//! Hosted Models Provider
//!
//! Chat completions served by the code-hosting platform, authenticated with
//! the same token used for publishing.

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{info, warn};

use super::chat::ChatClient;
use super::{AiProvider, ProviderConfig, decode_json};
use crate::constants::generation::{PROBE_MAX_TOKENS, PROBE_PROMPT};
use crate::types::Result;

const NAME: &str = "github-models";

#[derive(Debug)]
pub struct GitHubModelsProvider {
    chat: ChatClient,
}

impl GitHubModelsProvider {
    pub fn new(token: Option<SecretString>, config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            chat: ChatClient::new(NAME, token, config)?,
        })
    }
}

#[async_trait]
impl AiProvider for GitHubModelsProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.chat.model
    }

    fn supports_json_mode(&self) -> bool {
        true
    }

    async fn is_available(&self) -> bool {
        if !self.chat.has_credential() {
            return false;
        }

        // Tiny completion; the models endpoint has no cheap listing route
        match self
            .chat
            .complete(PROBE_PROMPT, false, Some(PROBE_MAX_TOKENS))
            .await
        {
            Ok(_) => {
                info!("GitHub Models is available");
                true
            }
            Err(e) => {
                warn!("GitHub Models check failed: {}", e);
                false
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        info!("Generating with GitHub Models (model: {})", self.chat.model);
        self.chat.complete(prompt, false, None).await
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value> {
        info!("Generating JSON with GitHub Models (model: {})", self.chat.model);
        let text = self.chat.complete(prompt, true, None).await?;
        decode_json(NAME, self.supports_json_mode(), &text)
    }
}
