//! Error classification
//!
//! Maps every failure a provider adapter can raise onto the small decision
//! vocabulary the retry executor and the dispatcher act on.

use std::collections::HashMap;
use std::time::Duration;

use super::policy::RetryPolicy;
use super::retry::RetryExhausted;
use crate::core::providers::unified_provider::ProviderError;

/// Outcome of classifying a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClassification {
    /// Switching providers cannot fix this; abort the whole dispatch
    Fatal,
    /// Worth retrying on the same provider, then failing over
    Retryable {
        /// Provider-supplied minimum wait before the next attempt
        retry_after: Option<Duration>,
    },
    /// A provider's attempt budget was consumed; inherits the wrapped outcome
    RetryExhausted(Box<ErrorClassification>),
}

impl ErrorClassification {
    /// Whether this outcome aborts the dispatch
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Fatal => true,
            Self::Retryable { .. } => false,
            Self::RetryExhausted(inner) => inner.is_fatal(),
        }
    }

    /// Whether the dispatcher may move on to the next provider
    pub fn allows_failover(&self) -> bool {
        !self.is_fatal()
    }

    /// Whether the same provider may be attempted again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable { .. })
    }

    /// Retry hint carried by this outcome
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Retryable { retry_after } => *retry_after,
            Self::RetryExhausted(inner) => inner.retry_after(),
            Self::Fatal => None,
        }
    }
}

/// Pure, total classifier for [`ProviderError`]
///
/// The default table treats credential failures and other client-side
/// errors as fatal, and rate limits, timeouts, connectivity problems and
/// adapter-flagged transient errors as retryable. Per-error-kind overrides
/// (keyed by [`ProviderError::error_type`]) may flip any entry except
/// credential failures and cancellations.
#[derive(Debug, Clone, Default)]
pub struct ErrorClassifier {
    overrides: HashMap<String, bool>,
}

impl ErrorClassifier {
    /// Classifier with the default table
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier with per-error-kind retryability overrides
    pub fn with_overrides(overrides: HashMap<String, bool>) -> Self {
        Self { overrides }
    }

    /// Classifier honouring the overrides configured on `policy`
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self::with_overrides(policy.retryable_overrides.clone())
    }

    /// Classify a provider failure
    ///
    /// Cancellation classifies as fatal so it can never be retried. The
    /// executor only skips classification when the caller's own token
    /// fired; an adapter aborting on its own ends up here.
    pub fn classify(&self, error: &ProviderError) -> ErrorClassification {
        let retryable = if is_locked_fatal(error) {
            false
        } else {
            self.overrides
                .get(error.error_type())
                .copied()
                .unwrap_or_else(|| is_retryable_by_default(error))
        };

        if retryable {
            ErrorClassification::Retryable {
                retry_after: error.retry_after(),
            }
        } else {
            ErrorClassification::Fatal
        }
    }

    /// Classify a retry-exhausted failure, inheriting the wrapped outcome
    pub fn classify_exhausted(&self, exhausted: &RetryExhausted) -> ErrorClassification {
        ErrorClassification::RetryExhausted(Box::new(self.classify(&exhausted.last_error)))
    }
}

/// Classify with the default table
pub fn classify(error: &ProviderError) -> ErrorClassification {
    ErrorClassifier::default().classify(error)
}

fn is_locked_fatal(error: &ProviderError) -> bool {
    match error {
        ProviderError::Authentication { .. } | ProviderError::Cancelled { .. } => true,
        ProviderError::ApiError { status, .. } => matches!(*status, 401 | 403),
        _ => false,
    }
}

fn is_retryable_by_default(error: &ProviderError) -> bool {
    match error {
        ProviderError::RateLimit { .. }
        | ProviderError::Timeout { .. }
        | ProviderError::Network { .. }
        | ProviderError::ProviderUnavailable { .. }
        | ProviderError::Transient { .. }
        | ProviderError::Streaming { .. } => true,

        ProviderError::ApiError { status, .. } => matches!(*status, 408 | 429 | 500..=599),

        ProviderError::Authentication { .. }
        | ProviderError::QuotaExceeded { .. }
        | ProviderError::ModelNotFound { .. }
        | ProviderError::InvalidRequest { .. }
        | ProviderError::NotSupported { .. }
        | ProviderError::ContextLengthExceeded { .. }
        | ProviderError::ContentFiltered { .. }
        | ProviderError::Cancelled { .. }
        | ProviderError::Other { .. } => false,
    }
}
