//! Provider Selection
//!
//! Walks configured backends in priority order and returns the first one
//! whose live probe succeeds. Candidates are constructed lazily, probed once,
//! and discarded when unavailable. Nothing is cached between calls.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use super::{AiProvider, Provider, ProviderConfig, ProviderKind};
use crate::ai::credentials::CredentialSource;
use crate::ai::timeout::{TimeoutConfig, with_timeout_map};
use crate::config::Config;
use crate::types::{BlogError, Result};

/// Outcome of probing one backend, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub kind: ProviderKind,
    pub model: String,
    pub has_credential: bool,
    pub available: bool,
}

/// Ordered fallback selection across configured backends
pub struct ProviderSelector {
    config: Config,
    credentials: Arc<dyn CredentialSource>,
    probe_timeout: Duration,
}

impl ProviderSelector {
    pub fn new(config: Config, credentials: Arc<dyn CredentialSource>) -> Self {
        let probe_timeout = TimeoutConfig::from(&config.timeouts).probe;
        Self {
            config,
            credentials,
            probe_timeout,
        }
    }

    /// Backends in the order they will be tried
    pub fn order(&self) -> Vec<ProviderKind> {
        self.config.provider_order()
    }

    /// First backend that reports available
    pub async fn select(&self) -> Result<Provider> {
        select_by(&self.order(), self.probe_timeout, |kind| self.build(kind)).await
    }

    /// Probe every configured backend without stopping at the first success
    pub async fn probe_all(&self) -> Vec<ProbeReport> {
        let mut reports = Vec::new();
        for kind in self.order() {
            let has_credential = self.credentials.resolve(kind.credential_key()).is_some();
            let model = ProviderConfig::for_kind(kind, &self.config).model;
            let available = match self.build(kind) {
                Ok(provider) => probe(&provider, self.probe_timeout).await,
                Err(e) => {
                    warn!("Could not construct {}: {}", kind, e);
                    false
                }
            };
            reports.push(ProbeReport {
                kind,
                model,
                has_credential,
                available,
            });
        }
        reports
    }

    fn build(&self, kind: ProviderKind) -> Result<Provider> {
        let credential = self.credentials.resolve(kind.credential_key());
        if credential.is_none() {
            info!("No credential found for {}", kind);
        }
        Provider::build(
            kind,
            credential,
            ProviderConfig::for_kind(kind, &self.config),
        )
    }
}

/// Selection loop over any provider type
///
/// `build` is called at most once per kind, in order, and never after a
/// candidate has been accepted.
#[instrument(skip(build))]
pub(crate) async fn select_by<P, F>(
    order: &[ProviderKind],
    probe_timeout: Duration,
    mut build: F,
) -> Result<P>
where
    P: AiProvider,
    F: FnMut(ProviderKind) -> Result<P>,
{
    let mut tried = Vec::with_capacity(order.len());

    for &kind in order {
        tried.push(kind.name().to_string());

        let candidate = match build(kind) {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Skipping {}: {}", kind, e);
                continue;
            }
        };

        info!("Testing {} provider...", candidate.name());
        if probe(&candidate, probe_timeout).await {
            info!(
                "Using {} (model: {}) for content generation",
                candidate.name(),
                candidate.model()
            );
            return Ok(candidate);
        }
        warn!("{} unavailable, falling back", candidate.name());
    }

    Err(BlogError::NoProviderAvailable { tried })
}

/// Availability probe bounded by `deadline`; a timeout reads as unavailable
async fn probe<P: AiProvider>(provider: &P, deadline: Duration) -> bool {
    let operation = format!("{} availability probe", provider.name());
    with_timeout_map(deadline, provider.is_available(), &operation)
        .await
        .unwrap_or_else(|e| {
            warn!("{}", e);
            false
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::credentials::CredentialKey;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Records every probe so tests can check call order
    struct MockProvider {
        kind: ProviderKind,
        available: bool,
        probe_delay: Option<Duration>,
        log: Arc<Mutex<Vec<ProviderKind>>>,
    }

    #[async_trait]
    impl AiProvider for MockProvider {
        fn name(&self) -> &str {
            self.kind.name()
        }

        fn model(&self) -> &str {
            "mock-model"
        }

        fn supports_json_mode(&self) -> bool {
            true
        }

        async fn is_available(&self) -> bool {
            self.log.lock().unwrap().push(self.kind);
            if let Some(delay) = self.probe_delay {
                tokio::time::sleep(delay).await;
            }
            self.available
        }

        async fn generate_text(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn generate_json(&self, _prompt: &str) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    const ORDER: [ProviderKind; 3] = [
        ProviderKind::Gemini,
        ProviderKind::GitHubModels,
        ProviderKind::OpenAiCompatible,
    ];

    fn builder(
        healthy: &'static [ProviderKind],
        log: Arc<Mutex<Vec<ProviderKind>>>,
    ) -> impl FnMut(ProviderKind) -> Result<MockProvider> {
        move |kind| {
            Ok(MockProvider {
                kind,
                available: healthy.contains(&kind),
                probe_delay: None,
                log: log.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_no_healthy_backend() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let err = select_by(&ORDER, Duration::from_secs(1), builder(&[], log.clone()))
            .await
            .err()
            .unwrap();

        match err {
            BlogError::NoProviderAvailable { tried } => {
                assert_eq!(tried, vec!["gemini", "github-models", "openai-compatible"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(*log.lock().unwrap(), ORDER.to_vec());
    }

    #[tokio::test]
    async fn test_second_backend_selected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let selected = select_by(
            &ORDER,
            Duration::from_secs(1),
            builder(&[ProviderKind::GitHubModels, ProviderKind::OpenAiCompatible], log.clone()),
        )
        .await
        .unwrap();

        assert_eq!(selected.kind, ProviderKind::GitHubModels);
        // First probed once, third never constructed
        assert_eq!(
            *log.lock().unwrap(),
            vec![ProviderKind::Gemini, ProviderKind::GitHubModels]
        );
    }

    #[tokio::test]
    async fn test_first_healthy_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let selected = select_by(&ORDER, Duration::from_secs(1), builder(&ORDER, log.clone()))
            .await
            .unwrap();
        assert_eq!(selected.kind, ProviderKind::Gemini);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_construction_failure_skips_candidate() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let selected = select_by(&ORDER, Duration::from_secs(1), move |kind| {
            if kind == ProviderKind::Gemini {
                return Err(BlogError::Config("bad client".into()));
            }
            Ok(MockProvider {
                kind,
                available: true,
                probe_delay: None,
                log: log_clone.clone(),
            })
        })
        .await
        .unwrap();
        assert_eq!(selected.kind, ProviderKind::GitHubModels);
    }

    #[tokio::test]
    async fn test_slow_probe_times_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let selected = select_by(&ORDER, Duration::from_millis(20), move |kind| {
            Ok(MockProvider {
                kind,
                available: true,
                probe_delay: (kind == ProviderKind::Gemini).then(|| Duration::from_secs(5)),
                log: log_clone.clone(),
            })
        })
        .await
        .unwrap();
        assert_eq!(selected.kind, ProviderKind::GitHubModels);
    }

    #[tokio::test]
    async fn test_selector_without_credentials() {
        let mut config = Config::default();
        config.llm.openai_compatible.enabled = true;
        let selector = ProviderSelector::new(config, Arc::new(|_: CredentialKey| None::<SecretString>));

        assert_eq!(selector.order().len(), 3);
        let err = selector.select().await.err().unwrap();
        assert!(matches!(err, BlogError::NoProviderAvailable { ref tried } if tried.len() == 3));

        let reports = selector.probe_all().await;
        assert!(reports.iter().all(|r| !r.has_credential && !r.available));
        assert_eq!(reports[0].model, "gemini-2.5-flash");
    }
}
