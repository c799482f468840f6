//! OpenAI-Compatible Provider
//!
//! Any endpoint implementing the chat completions protocol. Disabled unless
//! switched on in config.

use async_trait::async_trait;
use secrecy::SecretString;
use serde_json::Value;
use tracing::{info, warn};

use super::chat::ChatClient;
use super::{AiProvider, ProviderConfig, decode_json};
use crate::types::Result;

const NAME: &str = "openai-compatible";

#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    chat: ChatClient,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_key: Option<SecretString>, config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            chat: ChatClient::new(NAME, api_key, config)?,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiCompatibleProvider {
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

        match self.chat.list_models().await {
            Ok(()) => {
                info!("OpenAI-compatible API is available");
                true
            }
            Err(e) => {
                warn!("OpenAI-compatible API check failed: {}", e);
                false
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        info!(
            "Generating with OpenAI-compatible API (model: {})",
            self.chat.model
        );
        self.chat.complete(prompt, false, None).await
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value> {
        let text = self.chat.complete(prompt, true, None).await?;
        decode_json(NAME, self.supports_json_mode(), &text)
    }
}
