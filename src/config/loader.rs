//! Environment overrides

use super::DispatchConfig;
use crate::utils::error::{ClientError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Overrides `retry.max_attempts`
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "LITELLM_RETRY_MAX_ATTEMPTS";
/// Overrides `retry.base_delay_ms`
pub const ENV_RETRY_BASE_DELAY_MS: &str = "LITELLM_RETRY_BASE_DELAY_MS";
/// Overrides `retry.max_delay_ms`
pub const ENV_RETRY_MAX_DELAY_MS: &str = "LITELLM_RETRY_MAX_DELAY_MS";
/// Comma-separated provider order, replacing `providers`
pub const ENV_FAILOVER_PROVIDERS: &str = "LITELLM_FAILOVER_PROVIDERS";

impl DispatchConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_RETRY_MAX_ATTEMPTS) {
            self.retry.max_attempts = parse(ENV_RETRY_MAX_ATTEMPTS, &value)?;
        }
        if let Some(value) = lookup(ENV_RETRY_BASE_DELAY_MS) {
            self.retry.base_delay = Duration::from_millis(parse(ENV_RETRY_BASE_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_RETRY_MAX_DELAY_MS) {
            self.retry.max_delay = Duration::from_millis(parse(ENV_RETRY_MAX_DELAY_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_FAILOVER_PROVIDERS) {
            self.providers = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
            debug!(providers = ?self.providers, "Provider order overridden from environment");
        }
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ClientError::Config(format!("Invalid {}: {}", key, e)))
}
