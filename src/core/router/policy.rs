//! Retry policy
//!
//! Immutable value shared read-only by every concurrent call.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::utils::error::{ClientError, Result};

/// How backoff delays are randomized
///
/// Every strategy stays at or below the exponential ceiling, so the upper
/// bound of the delay never decreases as attempts grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// Sleep exactly the ceiling
    None,
    /// Uniform in `[0, ceiling]`
    Full,
    /// Uniform in `[ceiling / 2, ceiling]`
    #[default]
    Equal,
}

/// Retry configuration for a single provider
///
/// ## Defaults
///
/// - `max_attempts`: 3 (attempts per provider, including the first)
/// - `base_delay`: 100ms
/// - `max_delay`: 30s
/// - `jitter`: Equal
/// - `respect_retry_after`: true
/// - `attempt_timeout`: none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per provider, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt
    #[serde(rename = "base_delay_ms", with = "duration_ms", default = "default_base_delay")]
    pub base_delay: Duration,

    /// Cap on any single backoff delay
    #[serde(rename = "max_delay_ms", with = "duration_ms", default = "default_max_delay")]
    pub max_delay: Duration,

    /// Jitter strategy
    #[serde(default)]
    pub jitter: JitterStrategy,

    /// Per-error-kind retryability override, keyed by error type
    #[serde(default)]
    pub retryable_overrides: HashMap<String, bool>,

    /// Never sleep less than a provider-supplied retry hint
    #[serde(default = "default_true")]
    pub respect_retry_after: bool,

    /// Upper bound for a single attempt; exceeding it counts as a timeout
    #[serde(
        rename = "attempt_timeout_ms",
        with = "option_duration_ms",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attempt_timeout: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
            jitter: JitterStrategy::default(),
            retryable_overrides: HashMap::new(),
            respect_retry_after: true,
            attempt_timeout: None,
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` attempts per provider and default delays
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set base delay
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set max delay
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set jitter strategy
    pub fn with_jitter(mut self, jitter: JitterStrategy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Override retryability of one error kind
    pub fn with_override(mut self, error_type: impl Into<String>, retryable: bool) -> Self {
        self.retryable_overrides.insert(error_type.into(), retryable);
        self
    }

    /// Bound every attempt by `timeout`
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Stop honouring provider retry hints
    pub fn ignore_retry_after(mut self) -> Self {
        self.respect_retry_after = false;
        self
    }

    /// Exponential ceiling for the wait after failed attempt `attempt` (1-based):
    /// `min(base * 2^(attempt - 1), max)`
    pub fn backoff_ceiling(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Ceiling perturbed by the jitter strategy
    pub fn jittered_backoff(&self, attempt: u32) -> Duration {
        let ceiling = self.backoff_ceiling(attempt);
        let ceiling_nanos = u64::try_from(ceiling.as_nanos()).unwrap_or(u64::MAX);
        if ceiling_nanos == 0 {
            return ceiling;
        }

        match self.jitter {
            JitterStrategy::None => ceiling,
            JitterStrategy::Full => {
                Duration::from_nanos(rand::thread_rng().gen_range(0..=ceiling_nanos))
            }
            JitterStrategy::Equal => {
                let half = ceiling_nanos / 2;
                Duration::from_nanos(half + rand::thread_rng().gen_range(0..=ceiling_nanos - half))
            }
        }
    }

    /// Actual sleep after failed attempt `attempt`, given the error's hint
    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.jittered_backoff(attempt);
        match retry_after {
            Some(hint) if self.respect_retry_after => backoff.max(hint),
            _ => backoff,
        }
    }

    /// Check the policy is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ClientError::Validation(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.base_delay > self.max_delay {
            return Err(ClientError::Validation(format!(
                "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.base_delay.as_millis(),
                self.max_delay.as_millis()
            )));
        }
        if self.attempt_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::Validation(
                "retry.attempt_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_true() -> bool {
    true
}

/// Whole milliseconds in `value`, saturating at `u64::MAX`
pub(crate) fn saturating_millis(value: Duration) -> u64 {
    u64::try_from(value.as_millis()).unwrap_or(u64::MAX)
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(super::saturating_millis(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

mod option_duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&super::saturating_millis(*d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
    }
}
