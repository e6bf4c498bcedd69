//! Unified Provider Error Handling
//!
//! Single error type raised by every provider adapter.
//!
//! Adapters are responsible for translating their wire-level failures into
//! one of these variants, carrying enough information for the router's
//! [`ErrorClassifier`](crate::core::router::classifier::ErrorClassifier) to
//! decide between retrying, failing over and aborting.
//!
//! | Variant | Purpose | HTTP Status | Default classification |
//! |------|------|------------|--------|
//! | Authentication | Credential rejected | 401 | Fatal (never overridable) |
//! | RateLimit | Rate limit exceeded | 429 | Retryable (with hint) |
//! | QuotaExceeded | Billing quota exhausted | 402 | Fatal |
//! | ModelNotFound | Unknown model | 404 | Fatal |
//! | InvalidRequest | Malformed request | 400 | Fatal |
//! | Network | Connection failure | 503 | Retryable |
//! | ProviderUnavailable | Upstream down | 503 | Retryable |
//! | NotSupported | Feature unsupported | 405 | Fatal |
//! | Timeout | Upstream timeout | 408 | Retryable |
//! | ContextLengthExceeded | Prompt too long | 413 | Fatal |
//! | ContentFiltered | Safety filter | 400 | Fatal |
//! | ApiError | Raw status code | status | by status |
//! | Transient | Adapter-flagged transient | 503 | Retryable (with hint) |
//! | Cancelled | Caller cancelled | 499 | never classified |
//! | Streaming | Broken stream | 500 | Retryable before commit |
//! | Other | Anything else | 500 | Fatal |
//!
//! ## Usage
//!
//! ```rust
//! use litellm_dispatch::ProviderError;
//!
//! let err = ProviderError::rate_limit("anthropic", Some(2));
//! assert_eq!(err.provider(), "anthropic");
//! assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(2)));
//! ```

use std::time::Duration;

/// Unified provider error type - single error for all providers
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        /// Provider-supplied retry hint in seconds
        retry_after: Option<u64>,
    },

    #[error("Quota exceeded for {provider}: {message}")]
    QuotaExceeded {
        provider: &'static str,
        message: String,
    },

    #[error("Model '{model}' not found for {provider}")]
    ModelNotFound {
        provider: &'static str,
        model: String,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Provider {provider} is unavailable: {message}")]
    ProviderUnavailable {
        provider: &'static str,
        message: String,
    },

    #[error("Feature '{feature}' not supported by {provider}")]
    NotSupported {
        provider: &'static str,
        feature: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("Context length exceeded for {provider}: max {max} tokens, got {actual} tokens")]
    ContextLengthExceeded {
        provider: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Content filtered by {provider} safety systems: {reason}")]
    ContentFiltered {
        provider: &'static str,
        reason: String,
    },

    #[error("API error for {provider} (status {status}): {message}")]
    ApiError {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Failure the adapter explicitly flagged as safe to retry
    #[error("Transient error for {provider}: {message}")]
    Transient {
        provider: &'static str,
        message: String,
        retry_after: Option<u64>,
    },

    #[error("Operation cancelled for {provider}: {operation_type}")]
    Cancelled {
        provider: &'static str,
        operation_type: String,
    },

    #[error("Streaming error for {provider} at chunk {position:?}: {message}")]
    Streaming {
        provider: &'static str,
        /// Index of the chunk that failed, if known
        position: Option<u64>,
        message: String,
    },

    #[error("{provider} error: {message}")]
    Other {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    /// Create authentication error
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    /// Create rate limit error
    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider,
            message: match retry_after {
                Some(seconds) => format!("Rate limit exceeded. Retry after {} seconds", seconds),
                None => "Rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    /// Create quota exceeded error
    pub fn quota_exceeded(provider: &'static str, message: impl Into<String>) -> Self {
        Self::QuotaExceeded {
            provider,
            message: message.into(),
        }
    }

    /// Create model not found error
    pub fn model_not_found(provider: &'static str, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider,
            model: model.into(),
        }
    }

    /// Create invalid request error
    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    /// Create network error
    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    /// Create provider unavailable error
    pub fn provider_unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            message: message.into(),
        }
    }

    /// Create not supported error
    pub fn not_supported(provider: &'static str, feature: impl Into<String>) -> Self {
        Self::NotSupported {
            provider,
            feature: feature.into(),
        }
    }

    /// Create timeout error
    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    /// Create context length exceeded error
    pub fn context_length_exceeded(provider: &'static str, max: usize, actual: usize) -> Self {
        Self::ContextLengthExceeded {
            provider,
            max,
            actual,
        }
    }

    /// Create content filtered error
    pub fn content_filtered(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            provider,
            reason: reason.into(),
        }
    }

    /// Create API error with status code
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Create an adapter-flagged transient error
    pub fn transient(
        provider: &'static str,
        message: impl Into<String>,
        retry_after: Option<u64>,
    ) -> Self {
        Self::Transient {
            provider,
            message: message.into(),
            retry_after,
        }
    }

    /// Create cancellation error
    pub fn cancelled(provider: &'static str, operation_type: impl Into<String>) -> Self {
        Self::Cancelled {
            provider,
            operation_type: operation_type.into(),
        }
    }

    /// Create streaming error
    pub fn streaming(
        provider: &'static str,
        position: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        Self::Streaming {
            provider,
            position,
            message: message.into(),
        }
    }

    /// Create other/generic error
    pub fn other(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Other {
            provider,
            message: message.into(),
        }
    }

    /// Get the provider name that caused this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::ModelNotFound { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::Network { provider, .. }
            | Self::ProviderUnavailable { provider, .. }
            | Self::NotSupported { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ContextLengthExceeded { provider, .. }
            | Self::ContentFiltered { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::Transient { provider, .. }
            | Self::Cancelled { provider, .. }
            | Self::Streaming { provider, .. }
            | Self::Other { provider, .. } => provider,
        }
    }

    /// Stable snake_case kind, used as the key of retryability overrides
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::RateLimit { .. } => "rate_limit",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::ModelNotFound { .. } => "model_not_found",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Network { .. } => "network",
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::NotSupported { .. } => "not_supported",
            Self::Timeout { .. } => "timeout",
            Self::ContextLengthExceeded { .. } => "context_length_exceeded",
            Self::ContentFiltered { .. } => "content_filtered",
            Self::ApiError { .. } => "api_error",
            Self::Transient { .. } => "transient",
            Self::Cancelled { .. } => "cancelled",
            Self::Streaming { .. } => "streaming",
            Self::Other { .. } => "other",
        }
    }

    /// Provider-supplied retry hint, if any
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } | Self::Transient { retry_after, .. } => {
                retry_after.map(Duration::from_secs)
            }
            _ => None,
        }
    }

    /// Whether this error signals caller cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get HTTP status code for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication { .. } => 401,
            Self::RateLimit { .. } => 429,
            Self::QuotaExceeded { .. } => 402,
            Self::ModelNotFound { .. } => 404,
            Self::InvalidRequest { .. } => 400,
            Self::NotSupported { .. } => 405,
            Self::Timeout { .. } => 408,
            Self::Network { .. } | Self::ProviderUnavailable { .. } | Self::Transient { .. } => 503,
            Self::ContextLengthExceeded { .. } => 413,
            Self::ContentFiltered { .. } => 400,
            Self::ApiError { status, .. } => *status,
            Self::Cancelled { .. } => 499,
            Self::Streaming { .. } | Self::Other { .. } => 500,
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::other("unknown", format!("serialization failed: {}", err))
    }
}
