//! Configuration management for the dispatch client
//!
//! Loads the ordered provider list and retry policy from YAML, applies
//! environment overrides and validates the result.
//!
//! ```yaml
//! providers: [openai, anthropic, groq]
//! retry:
//!   max_attempts: 3
//!   base_delay_ms: 200
//!   max_delay_ms: 10000
//!   jitter: equal
//!   retryable_overrides:
//!     content_filtered: true
//! ```

mod loader;
mod validation;


pub use loader::{
    ENV_FAILOVER_PROVIDERS, ENV_RETRY_BASE_DELAY_MS, ENV_RETRY_MAX_ATTEMPTS,
    ENV_RETRY_MAX_DELAY_MS,
};

use crate::core::router::policy::RetryPolicy;
use crate::utils::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Provider order and retry policy for a [`FailoverDispatcher`](crate::FailoverDispatcher)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Registered provider names, in failover order
    #[serde(default)]
    pub providers: Vec<String>,

    /// Retry policy applied to each provider
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl DispatchConfig {
    /// Create a configuration from a provider order and policy
    pub fn new(providers: Vec<String>, retry: RetryPolicy) -> Self {
        Self { providers, retry }
    }

    /// Load configuration from a YAML file, apply environment overrides
    /// and validate
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dispatch configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::from_yaml_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        debug!(
            providers = ?config.providers,
            max_attempts = config.retry.max_attempts,
            "Dispatch configuration loaded"
        );
        Ok(config)
    }

    /// Parse configuration from YAML without overrides or validation
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
