//! Retry executor
//!
//! Runs one provider call under a bounded retry policy with exponential
//! backoff, consulting the classifier after every failure.

use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;

use tracing::{debug, error, warn};

use super::classifier::{ErrorClassification, ErrorClassifier};
use super::observer::{DispatchObserver, NoopObserver};
use super::policy::{RetryPolicy, saturating_millis};
use super::trace::{AttemptRecord, ExecutionTrace};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::provider::ProviderHandle;
use crate::core::types::RequestContext;

/// A provider's attempt budget was consumed without success
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Retries exhausted for {provider_id} after {attempts} attempts: {last_error}")]
pub struct RetryExhausted {
    /// Handle id of the exhausted provider
    pub provider_id: String,
    /// Attempts made
    pub attempts: u32,
    /// Error of the final attempt
    pub last_error: ProviderError,
    /// Classification of `last_error`
    pub last_classification: ErrorClassification,
}

impl RetryExhausted {
    /// `RETRY_EXHAUSTED` wrapping the last error's classification
    pub fn classification(&self) -> ErrorClassification {
        ErrorClassification::RetryExhausted(Box::new(self.last_classification.clone()))
    }

    /// Whether exhaustion still propagates as fatal
    pub fn is_fatal(&self) -> bool {
        self.classification().is_fatal()
    }
}

/// Failure of a single provider's retry loop
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecuteError {
    /// Fatal error, re-raised without further attempts
    #[error("{0}")]
    Fatal(ProviderError),

    /// Retryable errors until the budget ran out
    #[error(transparent)]
    Exhausted(RetryExhausted),

    /// Cancellation signal fired before or during an attempt or backoff
    #[error("Execution cancelled")]
    Cancelled,
}

/// Bounded retry loop around one provider
#[derive(Clone)]
pub struct RetryExecutor {
    policy: Arc<RetryPolicy>,
    classifier: ErrorClassifier,
    observer: Arc<dyn DispatchObserver>,
}

impl RetryExecutor {
    /// Executor for `policy`, classifying with the policy's overrides
    pub fn new(policy: Arc<RetryPolicy>) -> Self {
        let classifier = ErrorClassifier::from_policy(&policy);
        Self {
            policy,
            classifier,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Report every attempt to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Classifier in effect
    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    /// Run `operation` against `provider` until it succeeds, fails fatally,
    /// exhausts the attempt budget, or the call is cancelled
    ///
    /// Appends one [`AttemptRecord`] per invocation to `trace`.
    pub async fn execute<T, F, Fut>(
        &self,
        provider: &ProviderHandle,
        context: &RequestContext,
        trace: &mut ExecutionTrace,
        mut operation: F,
    ) -> Result<T, ExecuteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let cancellation = &context.cancellation;
        let mut attempt = 0;

        loop {
            attempt += 1;

            if cancellation.is_cancelled() {
                debug!(provider = %provider.id(), attempt, "Cancelled before attempt");
                return Err(ExecuteError::Cancelled);
            }

            let start = Instant::now();
            let outcome = tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                result = self.run_attempt(provider, operation()) => Some(result),
            };
            let duration = start.elapsed();

            let error = match outcome {
                Some(Ok(value)) => {
                    if attempt > 1 {
                        debug!(provider = %provider.id(), attempt, "Retry succeeded");
                    }
                    self.record(trace, provider, attempt, None, None, duration);
                    return Ok(value);
                }
                Some(Err(error)) if error.is_cancelled() && cancellation.is_cancelled() => {
                    self.record(trace, provider, attempt, Some(error), None, duration);
                    return Err(ExecuteError::Cancelled);
                }
                Some(Err(error)) => error,
                None => {
                    let error = ProviderError::cancelled(provider.provider_name(), "attempt");
                    self.record(trace, provider, attempt, Some(error), None, duration);
                    return Err(ExecuteError::Cancelled);
                }
            };

            let classification = self.classifier.classify(&error);
            self.record(
                trace,
                provider,
                attempt,
                Some(error.clone()),
                Some(classification.clone()),
                duration,
            );

            if classification.is_fatal() {
                error!(provider = %provider.id(), attempt, error = %error, "Fatal provider error");
                return Err(ExecuteError::Fatal(error));
            }

            if attempt >= max_attempts {
                warn!(
                    provider = %provider.id(),
                    attempts = attempt,
                    error = %error,
                    "Retries exhausted"
                );
                return Err(ExecuteError::Exhausted(RetryExhausted {
                    provider_id: provider.id().to_string(),
                    attempts: attempt,
                    last_error: error,
                    last_classification: classification,
                }));
            }

            let delay = self.policy.delay_for(attempt, classification.retry_after());
            debug!(
                provider = %provider.id(),
                attempt,
                delay_ms = saturating_millis(delay),
                error = %error,
                "Retryable error, backing off"
            );

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    debug!(provider = %provider.id(), attempt, "Cancelled during backoff");
                    return Err(ExecuteError::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn run_attempt<T, Fut>(
        &self,
        provider: &ProviderHandle,
        call: Fut,
    ) -> Result<T, ProviderError>
    where
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        match self.policy.attempt_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(ProviderError::timeout(
                    provider.provider_name(),
                    format!("attempt exceeded {}ms", limit.as_millis()),
                ))
            }),
            None => call.await,
        }
    }

    fn record(
        &self,
        trace: &mut ExecutionTrace,
        provider: &ProviderHandle,
        attempt_number: u32,
        error: Option<ProviderError>,
        classification: Option<ErrorClassification>,
        duration: std::time::Duration,
    ) {
        let record = AttemptRecord {
            provider_id: provider.id().to_string(),
            attempt_number,
            error,
            classification,
            duration,
        };
        self.observer.on_attempt(&record);
        trace.record_attempt(record);
    }
}
