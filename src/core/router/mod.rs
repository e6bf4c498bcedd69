//! Resilient request execution across AI providers
//!
//! Retries transient failures against one provider, fails over across an
//! ordered provider list, and keeps streamed output consistent once the
//! first chunk has been handed to the caller.
//!
//! ## Module Structure
//!
//! - `classifier` - Maps provider errors to fatal or retryable
//! - `policy` - Retry policy, backoff and jitter
//! - `retry` - Bounded retry against a single provider
//! - `streaming` - Commit tracking for streamed responses
//! - `dispatcher` - Ordered failover across providers
//! - `trace` - Per-request record of attempts and state transitions
//! - `observer` - Hooks for attempt, failover and completion events
//! - `error` - Dispatch and stream error types

pub mod classifier;
pub mod dispatcher;
pub mod error;
pub mod observer;
pub mod policy;
pub mod retry;
pub mod streaming;
pub mod trace;

#[cfg(test)]
mod tests;

pub use classifier::{ErrorClassification, ErrorClassifier, classify};
pub use dispatcher::{DispatchOutcome, FailoverDispatcher};
pub use error::{AggregatedFailure, DispatchError, StreamError};
pub use observer::{DispatchObserver, NoopObserver};
pub use policy::{JitterStrategy, RetryPolicy};
pub use retry::{ExecuteError, RetryExecutor, RetryExhausted};
pub use streaming::{FailoverStream, GuardedFailure, Pulled, StreamingGuard};
pub use trace::{AttemptRecord, DispatchState, ExecutionTrace};
