//! Unified Timeout Configuration
//!
//! Deadlines for remote calls. The reqwest clients carry the per-request
//! timeout; availability probes are additionally wrapped with
//! [`with_timeout_map`] so a slow probe can never stall selection.

use std::future::Future;
use std::time::Duration;

use crate::config::TimeoutsConfig;
use crate::constants::network as net_constants;
use crate::types::{BlogError, Result};

/// Timeout configuration for remote operations
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout for AI backend requests (default: 2 minutes)
    pub llm_request: Duration,
    /// Deadline for one availability probe (default: 20 seconds)
    pub probe: Duration,
    /// Timeout for repository host requests (default: 30 seconds)
    pub repository: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            llm_request: Duration::from_secs(net_constants::LLM_REQUEST_TIMEOUT_SECS),
            probe: Duration::from_secs(net_constants::PROBE_TIMEOUT_SECS),
            repository: Duration::from_secs(net_constants::REPOSITORY_TIMEOUT_SECS),
        }
    }
}

impl From<&TimeoutsConfig> for TimeoutConfig {
    fn from(config: &TimeoutsConfig) -> Self {
        Self {
            llm_request: Duration::from_secs(config.llm_request_secs),
            probe: Duration::from_secs(config.probe_secs),
            repository: Duration::from_secs(config.repository_secs),
        }
    }
}

/// Run a future under a deadline, wrapping its output in `Ok`
pub async fn with_timeout_map<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(BlogError::timeout(operation_name, timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_config_defaults() {
        let config = TimeoutConfig::default();
        assert_eq!(config.llm_request.as_secs(), 120);
        assert_eq!(config.probe.as_secs(), 20);
        assert_eq!(config.repository.as_secs(), 30);
    }

    #[test]
    fn test_from_config_section() {
        let section = TimeoutsConfig {
            llm_request_secs: 5,
            probe_secs: 1,
            repository_secs: 2,
        };
        let config = TimeoutConfig::from(&section);
        assert_eq!(config.llm_request, Duration::from_secs(5));
        assert_eq!(config.probe, Duration::from_secs(1));
        assert_eq!(config.repository, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_with_timeout_success() {
        let result = with_timeout_map(Duration::from_secs(1), async { 42 }, "test operation").await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result = with_timeout_map(
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                true
            },
            "slow probe",
        )
        .await;
        assert!(matches!(result.unwrap_err(), BlogError::Timeout { .. }));
    }
}
