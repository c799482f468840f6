//! Chat Completions Client
//!
//! Bearer-authenticated client for the OpenAI chat completions protocol.
//! Both the hosted-models backend and the OpenAI-compatible backend speak it.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderConfig, http_client};
use crate::types::{ProviderError, Result};

/// System prompt attached to JSON-mode requests
const JSON_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Always respond with valid JSON and nothing else.";

/// Shared request plumbing for chat-completions backends
pub(super) struct ChatClient {
    provider: &'static str,
    api_key: Option<SecretString>,
    api_base: String,
    pub(super) model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ChatClient {
    pub(super) fn new(
        provider: &'static str,
        api_key: Option<SecretString>,
        config: ProviderConfig,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            api_key,
            api_base: config.api_base,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.timeout)?,
        })
    }

    pub(super) fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> std::result::Result<&SecretString, ProviderError> {
        self.api_key
            .as_ref()
            .ok_or_else(|| ProviderError::missing_credential(self.provider))
    }

    /// Send one completion request and return the first choice's content
    pub(super) async fn complete(
        &self,
        prompt: &str,
        json_mode: bool,
        max_tokens: Option<u32>,
    ) -> Result<String> {
        let key = self.key()?;

        let mut messages = Vec::with_capacity(2);
        if json_mode {
            messages.push(ChatMessage::new("system", JSON_SYSTEM_PROMPT));
        }
        messages.push(ChatMessage::new("user", prompt));

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: max_tokens.unwrap_or(self.max_tokens),
            response_format: json_mode.then(ResponseFormat::json_object),
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!(provider = self.provider, model = %self.model, json_mode, "Sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(self.provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(self.provider, status.as_u16(), body).into());
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            ProviderError::malformed(self.provider, format!("invalid response body: {}", e))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::malformed(self.provider, "no content in response").into())
    }

    /// `GET {base}/models` succeeds with the configured credential
    pub(super) async fn list_models(&self) -> Result<()> {
        let key = self.key()?;
        let url = format!("{}/models", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::transport(self.provider, &e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::http(self.provider, status.as_u16(), body).into())
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatMessage<'a> {
    fn new(role: &'static str, content: &'a str) -> Self {
        Self { role, content }
    }
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    fn json_object() -> Self {
        Self {
            format_type: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
