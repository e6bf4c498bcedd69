//! Router error types
//!
//! Callers of the dispatcher observe exactly one of: a result, the original
//! fatal [`ProviderError`], an [`AggregatedFailure`], or a cancellation.

use std::fmt;

use super::retry::RetryExhausted;
use super::trace::ExecutionTrace;
use crate::core::providers::unified_provider::ProviderError;

/// Every configured provider was tried to exhaustion
///
/// One entry per configured provider, in configured order. A provider that
/// could not serve the request appears with zero attempts and a
/// `NotSupported` error. Never constructed when a fatal error
/// short-circuits the dispatch.
#[derive(Debug, Clone)]
pub struct AggregatedFailure {
    failures: Vec<RetryExhausted>,
    trace: Box<ExecutionTrace>,
}

impl AggregatedFailure {
    pub(crate) fn new(failures: Vec<RetryExhausted>, trace: ExecutionTrace) -> Self {
        Self {
            failures,
            trace: Box::new(trace),
        }
    }

    /// Terminal failure of each provider, in configured order
    pub fn failures(&self) -> &[RetryExhausted] {
        &self.failures
    }

    /// Number of providers that failed
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether the dispatcher had no providers
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Provider ids, in configured order
    pub fn provider_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.provider_id.as_str()).collect()
    }

    /// Terminal error of one provider
    pub fn error_for(&self, provider_id: &str) -> Option<&ProviderError> {
        self.failures
            .iter()
            .find(|f| f.provider_id == provider_id)
            .map(|f| &f.last_error)
    }

    /// Trace of the failed dispatch
    pub fn trace(&self) -> &ExecutionTrace {
        &self.trace
    }
}

impl fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "All {} providers failed", self.failures.len())?;
        for (idx, failure) in self.failures.iter().enumerate() {
            let sep = if idx == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, failure.provider_id, failure.last_error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedFailure {}

/// Dispatch failure
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// A fatal error aborted the dispatch; displays as the original error
    #[error("{error}")]
    Fatal {
        error: ProviderError,
        trace: Box<ExecutionTrace>,
    },

    /// Every provider exhausted its retries
    #[error(transparent)]
    AllProvidersFailed(#[from] AggregatedFailure),

    /// The caller's cancellation signal fired
    #[error("Dispatch cancelled for request {}", .trace.request_id())]
    Cancelled { trace: Box<ExecutionTrace> },
}

impl DispatchError {
    /// Trace of the failed dispatch
    pub fn trace(&self) -> &ExecutionTrace {
        match self {
            Self::Fatal { trace, .. } | Self::Cancelled { trace } => trace,
            Self::AllProvidersFailed(failure) => failure.trace(),
        }
    }

    /// The original fatal error, if this is a fatal abort
    pub fn fatal_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Fatal { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Unwrap the original fatal error
    pub fn into_fatal_error(self) -> Option<ProviderError> {
        match self {
            Self::Fatal { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Whether the dispatch was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Error item of a committed stream
///
/// Once a chunk has reached the caller, failures are surfaced as they are:
/// never retried, never failed over and never aggregated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// Error raised by the committed provider, verbatim
    #[error(transparent)]
    PostCommit(ProviderError),

    /// The caller's cancellation signal fired between chunks
    #[error("Stream cancelled after {delivered} chunks")]
    Cancelled { delivered: u64 },
}
