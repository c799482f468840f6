//! Gemini Provider
//!
//! Primary cloud backend using the `generateContent` endpoint. The API has no
//! JSON mode we rely on, so structured output always goes through the
//! extractor.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AiProvider, ProviderConfig, decode_json, http_client};
use crate::constants::generation::{PROBE_MAX_TOKENS, PROBE_PROMPT};
use crate::types::{ProviderError, Result};

const NAME: &str = "gemini";

pub struct GeminiProvider {
    /// Stored securely - never exposed in logs or debug output
    api_key: Option<SecretString>,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(api_key: Option<SecretString>, config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            api_key,
            api_base: config.api_base,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: http_client(config.timeout)?,
        })
    }

    fn build_request<'a>(&self, prompt: &'a str, max_tokens: u32) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: max_tokens,
            },
        }
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<GenerateContentResponse> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::missing_credential(NAME))?;

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        debug!(model = %self.model, "Sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key.expose_secret())
            .json(&self.build_request(prompt, max_tokens))
            .send()
            .await
            .map_err(|e| ProviderError::transport(NAME, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(NAME, status.as_u16(), body).into());
        }

        response.json().await.map_err(|e| {
            ProviderError::malformed(NAME, format!("invalid response body: {}", e)).into()
        })
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_json_mode(&self) -> bool {
        false
    }

    async fn is_available(&self) -> bool {
        if self.api_key.is_none() {
            return false;
        }

        // Any candidate counts; thinking models may spend the tiny budget before emitting text
        match self.generate(PROBE_PROMPT, PROBE_MAX_TOKENS).await {
            Ok(body) if !body.candidates.is_empty() => {
                info!("Gemini API is available");
                true
            }
            Ok(_) => {
                warn!("Gemini API check returned no candidates");
                false
            }
            Err(e) => {
                warn!("Gemini API check failed: {}", e);
                false
            }
        }
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        info!(
            "Generating with Gemini (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let body = self.generate(prompt, self.max_tokens).await?;
        body.text()
            .ok_or_else(|| ProviderError::malformed(NAME, "no text in response").into())
    }

    async fn generate_json(&self, prompt: &str) -> Result<Value> {
        let text = self.generate_text(prompt).await?;
        decode_json(NAME, self.supports_json_mode(), &text)
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
