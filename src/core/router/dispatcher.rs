//! Failover dispatcher
//!
//! Tries the configured providers strictly in order, delegating each one to
//! the [`RetryExecutor`], and turns the outcome into a result, the original
//! fatal error, or an [`AggregatedFailure`].
//!
//! A provider lacking a capability the request needs is passed over without
//! being invoked; it still takes its slot in the aggregated failure, with
//! zero attempts and a `NotSupported` error.
//!
//! ## State machine
//!
//! ```text
//! NotStarted -> TryingProvider(0) -> ... -> TryingProvider(n-1)
//! TryingProvider(i) --success--------------------> Succeeded | Committed
//! Committed         --stream error---------------> FailedPostCommit
//! TryingProvider(i) --fatal----------------------> FailedFatal
//! TryingProvider(i) --exhausted, i+1 < n---------> TryingProvider(i+1)
//! TryingProvider(i) --exhausted, i+1 == n--------> FailedAll
//! any               --cancellation---------------> Cancelled
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use super::error::{AggregatedFailure, DispatchError};
use super::observer::{DispatchObserver, NoopObserver};
use super::policy::RetryPolicy;
use super::retry::{ExecuteError, RetryExecutor, RetryExhausted};
use super::streaming::{FailoverStream, GuardedFailure, Pulled, StreamingGuard};
use super::trace::{DispatchState, ExecutionTrace};
use crate::config::DispatchConfig;
use crate::core::providers::provider_registry::ProviderRegistry;
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::provider::ProviderHandle;
use crate::core::types::{ChatChunk, ChatRequest, ChatResponse, RequestContext};
use crate::utils::error::{ClientError, Result};

/// Successful synchronous dispatch
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// The provider's response
    pub response: ChatResponse,
    /// What it took to get it
    pub trace: ExecutionTrace,
}

/// Ordered failover across providers
///
/// Providers and policy are injected at construction and shared read-only
/// by every call; each call owns its own [`ExecutionTrace`].
#[derive(Clone)]
pub struct FailoverDispatcher {
    providers: Arc<[ProviderHandle]>,
    executor: RetryExecutor,
    observer: Arc<dyn DispatchObserver>,
}

impl FailoverDispatcher {
    /// Create a dispatcher over `providers`, tried in the given order
    ///
    /// Handle ids key the trace, so the list must be non-empty and free of
    /// duplicate ids.
    pub fn new(providers: Vec<ProviderHandle>, policy: RetryPolicy) -> Result<Self> {
        if providers.is_empty() {
            return Err(ClientError::validation("At least one provider is required"));
        }

        let mut seen = HashSet::with_capacity(providers.len());
        for handle in &providers {
            if !seen.insert(handle.id()) {
                return Err(ClientError::validation(format!(
                    "Provider '{}' is listed more than once",
                    handle.id()
                )));
            }
        }

        Ok(Self {
            providers: providers.into(),
            executor: RetryExecutor::new(Arc::new(policy)),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Resolve the configured provider order against `registry`
    ///
    /// The registry is read once here and never during dispatch.
    pub fn from_config(config: &DispatchConfig, registry: &ProviderRegistry) -> Result<Self> {
        config.validate()?;
        let providers = registry.resolve(&config.providers)?;
        Self::new(providers, config.retry.clone())
    }

    /// Report attempts, failovers and completions to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.executor = self.executor.with_observer(Arc::clone(&observer));
        self.observer = observer;
        self
    }

    /// Providers in failover order
    pub fn providers(&self) -> &[ProviderHandle] {
        &self.providers
    }

    /// Retry policy applied to each provider
    pub fn policy(&self) -> &RetryPolicy {
        self.executor.policy()
    }

    /// Execute a synchronous completion with retry and failover
    #[instrument(
        name = "dispatch",
        skip_all,
        fields(request_id = %context.request_id, model = %request.model)
    )]
    pub async fn dispatch(
        &self,
        request: ChatRequest,
        context: RequestContext,
    ) -> std::result::Result<DispatchOutcome, DispatchError> {
        let (response, trace) = self
            .run(
                &request,
                &context,
                false,
                |handle| {
                    let handle = handle.clone();
                    let request = request.clone();
                    let context = context.clone();
                    async move { handle.chat_completion(request, context).await }
                },
                |_| DispatchState::Succeeded,
            )
            .await?;

        Ok(DispatchOutcome {
            response,
            trace: self.finish(trace),
        })
    }

    /// Execute a streaming completion
    ///
    /// A provider is committed once its first chunk has been pulled; from
    /// then on its stream, including any later error, is forwarded to the
    /// caller and no other provider is tried. A provider whose stream ends
    /// without a single chunk serves an empty response. The returned
    /// stream finalizes the trace when it ends.
    #[instrument(
        name = "dispatch_stream",
        skip_all,
        fields(request_id = %context.request_id, model = %request.model)
    )]
    pub async fn dispatch_stream(
        &self,
        request: ChatRequest,
        context: RequestContext,
    ) -> std::result::Result<FailoverStream, DispatchError> {
        let mut request = request;
        request.stream = true;

        let ((guard, first), trace) = self
            .run(
                &request,
                &context,
                true,
                |handle| {
                    let handle = handle.clone();
                    let request = request.clone();
                    let context = context.clone();
                    async move { open_and_prime(handle, request, context).await }
                },
                |primed: &(StreamingGuard, Option<ChatChunk>)| {
                    if primed.1.is_some() {
                        DispatchState::Committed
                    } else {
                        DispatchState::Succeeded
                    }
                },
            )
            .await?;

        Ok(FailoverStream::new(
            trace,
            Arc::clone(&self.observer),
            guard,
            first,
            context.cancellation.clone(),
        ))
    }

    /// [`dispatch`](Self::dispatch) with a fresh context, returning only the response
    pub async fn complete(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatResponse, DispatchError> {
        self.dispatch(request, RequestContext::new())
            .await
            .map(|outcome| outcome.response)
    }

    /// [`dispatch_stream`](Self::dispatch_stream) with a fresh context
    pub async fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<FailoverStream, DispatchError> {
        self.dispatch_stream(request, RequestContext::new()).await
    }

    async fn run<T, F, Fut, S>(
        &self,
        request: &ChatRequest,
        context: &RequestContext,
        streaming: bool,
        mut call: F,
        success_state: S,
    ) -> std::result::Result<(T, ExecutionTrace), DispatchError>
    where
        F: FnMut(&ProviderHandle) -> Fut,
        Fut: Future<Output = std::result::Result<T, ProviderError>>,
        S: Fn(&T) -> DispatchState,
    {
        let mut trace = ExecutionTrace::new(context.request_id.clone(), streaming);
        let mut failures = Vec::with_capacity(self.providers.len());

        for (idx, handle) in self.providers.iter().enumerate() {
            if let Some(feature) = handle.missing_capability(request, streaming) {
                debug!(provider = %handle.id(), feature, "Skipping provider lacking capability");
                failures.push(self.unsupported(handle, feature));
                continue;
            }

            trace.transition(DispatchState::TryingProvider(idx));

            let outcome = self
                .executor
                .execute(handle, context, &mut trace, || call(handle))
                .await;

            match outcome {
                Ok(value) => {
                    trace.set_provider_used(handle.id());
                    trace.transition(success_state(&value));
                    let used_fallback = trace.used_fallback();
                    info!(
                        provider = %handle.id(),
                        attempts = trace.total_attempts(),
                        used_fallback,
                        "Request served"
                    );
                    return Ok((value, trace));
                }
                Err(ExecuteError::Fatal(error)) => {
                    error!(provider = %handle.id(), error = %error, "Aborting dispatch on fatal error");
                    trace.transition(DispatchState::FailedFatal);
                    return Err(DispatchError::Fatal {
                        error,
                        trace: Box::new(self.finish(trace)),
                    });
                }
                Err(ExecuteError::Cancelled) => {
                    info!(provider = %handle.id(), "Dispatch cancelled");
                    trace.transition(DispatchState::Cancelled);
                    return Err(DispatchError::Cancelled {
                        trace: Box::new(self.finish(trace)),
                    });
                }
                Err(ExecuteError::Exhausted(exhausted)) => {
                    let classification = self.executor.classifier().classify_exhausted(&exhausted);
                    if !classification.allows_failover() {
                        error!(
                            provider = %handle.id(),
                            error = %exhausted.last_error,
                            "Retries exhausted on a fatal error"
                        );
                        trace.transition(DispatchState::FailedFatal);
                        return Err(DispatchError::Fatal {
                            error: exhausted.last_error,
                            trace: Box::new(self.finish(trace)),
                        });
                    }

                    let next = self.providers[idx + 1..]
                        .iter()
                        .find(|next| next.can_serve(request, streaming));
                    if let Some(next) = next {
                        warn!(
                            provider = %handle.id(),
                            next_provider = %next.id(),
                            error = %exhausted.last_error,
                            "Provider exhausted, failing over"
                        );
                        self.observer.on_failover(handle.id(), next.id(), &exhausted);
                    }
                    failures.push(exhausted);
                }
            }
        }

        warn!(providers = failures.len(), "All providers failed");
        trace.transition(DispatchState::FailedAll);
        Err(DispatchError::AllProvidersFailed(AggregatedFailure::new(
            failures,
            self.finish(trace),
        )))
    }

    fn unsupported(&self, handle: &ProviderHandle, feature: &'static str) -> RetryExhausted {
        let error = ProviderError::not_supported(handle.provider_name(), feature);
        RetryExhausted {
            provider_id: handle.id().to_string(),
            attempts: 0,
            last_classification: self.executor.classifier().classify(&error),
            last_error: error,
        }
    }

    fn finish(&self, mut trace: ExecutionTrace) -> ExecutionTrace {
        trace.finalize();
        self.observer.on_complete(&trace);
        trace
    }
}

impl std::fmt::Debug for FailoverDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverDispatcher")
            .field("providers", &self.providers)
            .field("policy", self.executor.policy())
            .finish_non_exhaustive()
    }
}

/// Open a stream and pull its first unit, so a failure before any output
/// counts as an ordinary attempt failure
async fn open_and_prime(
    handle: ProviderHandle,
    request: ChatRequest,
    context: RequestContext,
) -> std::result::Result<(StreamingGuard, Option<ChatChunk>), ProviderError> {
    let stream = handle.chat_completion_stream(request, context).await?;
    let mut guard = StreamingGuard::new(handle.id(), stream);

    match guard.pull().await {
        Pulled::Chunk(chunk) => Ok((guard, Some(chunk))),
        Pulled::End => Ok((guard, None)),
        Pulled::Failed(GuardedFailure::PreCommit(error)) => Err(error),
        Pulled::Failed(GuardedFailure::PostCommit(error)) => Err(error),
    }
}
