//! Observability sink
//!
//! The dispatcher reports what it does through this trait; turning those
//! callbacks into metrics is left to the embedding application.

use super::retry::RetryExhausted;
use super::trace::{AttemptRecord, ExecutionTrace};

/// Callbacks fired by the dispatcher; every hook defaults to a no-op
pub trait DispatchObserver: Send + Sync {
    /// One provider invocation finished, successfully or not
    fn on_attempt(&self, _record: &AttemptRecord) {}

    /// The dispatcher is moving from one provider to the next
    fn on_failover(&self, _from: &str, _to: &str, _failure: &RetryExhausted) {}

    /// The dispatch reached a terminal state; for streams, once the stream ends
    fn on_complete(&self, _trace: &ExecutionTrace) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
