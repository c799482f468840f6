//! Content Workflow
//!
//! Runs the three agents (market analysis, content strategy, writer) against
//! the selected provider, then hands the post to the publish pipeline.

mod prompts;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::ai::provider::AiProvider;
use crate::publish::{PublishAttemptResult, PublishOptions, PublishPipeline, RepositoryHost};
use crate::types::{ProviderError, Result};

/// Strategy agent output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStrategy {
    pub topic: String,
    pub angle: String,
    pub target_keywords: Vec<String>,
    pub content_type: String,
    pub cta: String,
}

impl Default for ContentStrategy {
    fn default() -> Self {
        Self {
            topic: "AI automation in the enterprise".to_string(),
            angle: "Practical steps to measurable ROI".to_string(),
            target_keywords: vec![
                "AI".to_string(),
                "automation".to_string(),
                "digital transformation".to_string(),
            ],
            content_type: "technical deep-dive".to_string(),
            cta: "Contact us to plan your automation roadmap".to_string(),
        }
    }
}

impl ContentStrategy {
    /// Lenient decoding; missing or mistyped fields keep their defaults
    pub fn from_value(value: &Value) -> Self {
        // Some models wrap the object in a one-element array
        let value = match value {
            Value::Array(items) => items.first().unwrap_or(value),
            other => other,
        };

        let mut strategy = Self::default();
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        if let Some(topic) = text("topic") {
            strategy.topic = topic;
        }
        if let Some(angle) = text("angle") {
            strategy.angle = angle;
        }
        if let Some(content_type) = text("contentType") {
            strategy.content_type = content_type;
        }
        if let Some(cta) = text("cta") {
            strategy.cta = cta;
        }

        let keywords: Vec<String> = match value.get("targetKeywords") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(joined)) => joined
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };
        if !keywords.is_empty() {
            strategy.target_keywords = keywords;
        }

        strategy
    }
}

/// Everything produced by one workflow run
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub provider: String,
    pub model: String,
    pub market: Value,
    pub strategy: ContentStrategy,
    pub publish: PublishAttemptResult,
}

/// Sequential agents followed by publishing
pub struct ContentWorkflow<P, H> {
    provider: P,
    pipeline: PublishPipeline<H>,
}

impl<P: AiProvider, H: RepositoryHost> ContentWorkflow<P, H> {
    pub fn new(provider: P, pipeline: PublishPipeline<H>) -> Self {
        Self { provider, pipeline }
    }

    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn run(&self, options: PublishOptions) -> Result<WorkflowReport> {
        let market = self.analyze_market().await?;
        info!("Market analysis gathered");

        let strategy = self.build_strategy(&market).await?;
        info!("Content strategy: {}", strategy.topic);

        let content = self.write_post(&strategy).await?;
        info!("Post generated ({} chars)", content.len());

        let publish = self.pipeline.publish(&content, options).await?;
        info!("Published via {}: {}", publish.method, publish.location);

        Ok(WorkflowReport {
            provider: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
            market,
            strategy,
            publish,
        })
    }

    pub async fn analyze_market(&self) -> Result<Value> {
        self.provider.generate_json(prompts::MARKET_ANALYSIS).await
    }

    pub async fn build_strategy(&self, market: &Value) -> Result<ContentStrategy> {
        let value = self
            .provider
            .generate_json(&prompts::content_strategy(market))
            .await?;
        if !value.is_object() && !value.is_array() {
            warn!("Strategy agent returned a scalar; using defaults");
        }
        Ok(ContentStrategy::from_value(&value))
    }

    pub async fn write_post(&self, strategy: &ContentStrategy) -> Result<String> {
        let content = self.provider.generate_text(&prompts::writer(strategy)).await?;
        if content.trim().is_empty() {
            return Err(
                ProviderError::malformed(self.provider.name(), "writer returned empty content")
                    .into(),
            );
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishConfig;
    use crate::publish::{GitHubHost, PublishMethod};
    use crate::types::BlogError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Replays canned responses and records prompts
    struct ScriptedProvider {
        market: Value,
        strategy: Value,
        post: String,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(strategy: Value, post: &str) -> Self {
            Self {
                market: json!({"trends": ["agentic AI"], "recommendedTopics": ["AI agents"]}),
                strategy,
                post: post.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-1"
        }

        fn supports_json_mode(&self) -> bool {
            true
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn generate_text(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.post.clone())
        }

        async fn generate_json(&self, prompt: &str) -> Result<Value> {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            Ok(if prompts.len() == 1 {
                self.market.clone()
            } else {
                self.strategy.clone()
            })
        }
    }

    fn pipeline(root: &TempDir) -> PublishPipeline<GitHubHost> {
        PublishPipeline::new(
            None,
            PublishConfig {
                local_root: root.path().to_path_buf(),
                retry_delay_ms: 0,
                ..PublishConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_run_end_to_end_local() {
        let root = TempDir::new().unwrap();
        let provider = ScriptedProvider::new(
            json!({
                "topic": "AI Agents in Ops",
                "angle": "reliability",
                "targetKeywords": ["agents", "ops"],
                "contentType": "guide",
                "cta": "Talk to us"
            }),
            "# AI Agents in Ops\n\nBody.",
        );
        let workflow = ContentWorkflow::new(provider, pipeline(&root));

        let report = workflow
            .run(PublishOptions {
                manual: true,
                ..PublishOptions::default()
            })
            .await
            .unwrap();

        assert_eq!(report.provider, "scripted");
        assert_eq!(report.strategy.topic, "AI Agents in Ops");
        assert_eq!(report.publish.method, PublishMethod::LocalSave);
        assert_eq!(report.publish.slug, "ai-agents-in-ops");
        assert!(root.path().join(&report.publish.file_path).exists());

        let prompts = workflow.provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[1].contains("agentic AI"));
        assert!(prompts[2].contains("Keywords: agents, ops"));
    }

    #[tokio::test]
    async fn test_empty_post_is_rejected() {
        let root = TempDir::new().unwrap();
        let workflow = ContentWorkflow::new(ScriptedProvider::new(json!({}), "  \n"), pipeline(&root));

        let err = workflow.run(PublishOptions::default()).await.unwrap_err();
        assert!(matches!(err, BlogError::Provider(_)));
        assert!(!root.path().join("blog").exists());
    }

    #[test]
    fn test_strategy_defaults_for_missing_fields() {
        let strategy = ContentStrategy::from_value(&json!({"topic": "Vector search"}));
        assert_eq!(strategy.topic, "Vector search");
        assert_eq!(strategy.cta, ContentStrategy::default().cta);
        assert_eq!(strategy.target_keywords, ContentStrategy::default().target_keywords);
    }

    #[test]
    fn test_strategy_lenient_shapes() {
        let strategy = ContentStrategy::from_value(&json!([{
            "topic": "RAG",
            "targetKeywords": "retrieval, grounding ,",
            "cta": 42
        }]));
        assert_eq!(strategy.topic, "RAG");
        assert_eq!(strategy.target_keywords, vec!["retrieval", "grounding"]);
        assert_eq!(strategy.cta, ContentStrategy::default().cta);

        assert_eq!(ContentStrategy::from_value(&json!("oops")), ContentStrategy::default());
    }
}
