//! Commit-aware streaming
//!
//! [`StreamingGuard`] tracks whether any chunk of a streaming call has
//! reached the caller. Before that point a failure is an ordinary error the
//! dispatcher may retry or fail over; after it, failover is illegal and any
//! error is surfaced to the caller as-is.

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::error::StreamError;
use super::observer::DispatchObserver;
use super::trace::{DispatchState, ExecutionTrace};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::traits::provider::ChatStream;
use crate::core::types::ChatChunk;

/// Failure reported by [`StreamingGuard::pull`]
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedFailure {
    /// Nothing was delivered yet; the dispatcher may classify and fail over
    PreCommit(ProviderError),
    /// Output already reached the caller; terminal for the whole call
    PostCommit(ProviderError),
}

impl GuardedFailure {
    /// The underlying provider error
    pub fn into_inner(self) -> ProviderError {
        match self {
            Self::PreCommit(error) | Self::PostCommit(error) => error,
        }
    }
}

/// Result of one pull
#[derive(Debug, Clone, PartialEq)]
pub enum Pulled {
    /// Next chunk
    Chunk(ChatChunk),
    /// The provider finished the stream
    End,
    /// The provider failed
    Failed(GuardedFailure),
}

/// Wraps one provider's chunk sequence and owns the `committed` flag
pub struct StreamingGuard {
    provider_id: String,
    inner: ChatStream,
    committed: bool,
    finished: bool,
    delivered: u64,
}

impl StreamingGuard {
    /// Guard `inner`, produced by provider `provider_id`
    pub fn new(provider_id: impl Into<String>, inner: ChatStream) -> Self {
        Self {
            provider_id: provider_id.into(),
            inner,
            committed: false,
            finished: false,
            delivered: 0,
        }
    }

    /// Provider whose stream is guarded
    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// Whether a chunk has been handed out; never resets
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Chunks handed out so far
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Pull the next unit from the provider
    ///
    /// Handing out a chunk commits the guard. After the end of the stream or
    /// any failure, further pulls return [`Pulled::End`].
    pub async fn pull(&mut self) -> Pulled {
        if self.finished {
            return Pulled::End;
        }

        match self.inner.next().await {
            Some(Ok(chunk)) => {
                self.committed = true;
                self.delivered += 1;
                Pulled::Chunk(chunk)
            }
            Some(Err(error)) => {
                self.finished = true;
                if self.committed {
                    Pulled::Failed(GuardedFailure::PostCommit(error))
                } else {
                    Pulled::Failed(GuardedFailure::PreCommit(error))
                }
            }
            None => {
                self.finished = true;
                Pulled::End
            }
        }
    }
}

/// Trace of a committed stream, completed once when the stream ends
struct StreamRecord {
    trace: Mutex<ExecutionTrace>,
    observer: Arc<dyn DispatchObserver>,
    completed: AtomicBool,
}

impl StreamRecord {
    fn snapshot(&self) -> ExecutionTrace {
        self.trace.lock().clone()
    }

    fn complete(&self, update: impl FnOnce(&mut ExecutionTrace)) {
        if self.completed.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut trace = self.trace.lock();
        update(&mut trace);
        trace.finalize();
        self.observer.on_complete(&trace);
    }
}

/// Stream returned by a streaming dispatch
///
/// Yields the committed provider's chunks; a post-commit failure arrives as
/// a single [`StreamError::PostCommit`] item and ends the stream. The trace
/// stays open while the stream runs and is finalized, with the observer's
/// `on_complete` fired, when it ends or is dropped.
pub struct FailoverStream {
    provider_used: Option<String>,
    record: Arc<StreamRecord>,
    inner: Pin<Box<dyn Stream<Item = Result<ChatChunk, StreamError>> + Send>>,
}

impl FailoverStream {
    /// Wrap a primed guard; `first` is the chunk pulled during dispatch
    pub(crate) fn new(
        trace: ExecutionTrace,
        observer: Arc<dyn DispatchObserver>,
        mut guard: StreamingGuard,
        first: Option<ChatChunk>,
        cancellation: CancellationToken,
    ) -> Self {
        let provider_used = trace.provider_used().map(str::to_string);
        let record = Arc::new(StreamRecord {
            trace: Mutex::new(trace),
            observer,
            completed: AtomicBool::new(false),
        });
        let shared = Arc::clone(&record);

        let inner = async_stream::stream! {
            if let Some(chunk) = first {
                yield Ok(chunk);
            }

            loop {
                let next = tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => None,
                    pulled = guard.pull() => Some(pulled),
                };

                match next {
                    None => {
                        shared.complete(|trace| trace.transition(DispatchState::Cancelled));
                        yield Err(StreamError::Cancelled { delivered: guard.delivered() });
                        break;
                    }
                    Some(Pulled::Chunk(chunk)) => {
                        yield Ok(chunk);
                    }
                    Some(Pulled::End) => {
                        shared.complete(|_| {});
                        break;
                    }
                    Some(Pulled::Failed(failure)) => {
                        let error = failure.into_inner();
                        warn!(
                            provider = %guard.provider_id(),
                            delivered = guard.delivered(),
                            error = %error,
                            "Stream failed after commit"
                        );
                        shared.complete(|trace| trace.fail_after_commit(error.clone()));
                        yield Err(StreamError::PostCommit(error));
                        break;
                    }
                }
            }
        };

        Self {
            provider_used,
            record,
            inner: Box::pin(inner),
        }
    }

    /// Snapshot of the dispatch trace
    ///
    /// Reads [`DispatchState::Committed`] (or `Succeeded` for an empty
    /// stream) while chunks are flowing; once the stream has ended it holds
    /// the terminal state, any post-commit error and the total latency.
    pub fn trace(&self) -> ExecutionTrace {
        self.record.snapshot()
    }

    /// Provider serving the stream
    pub fn provider_used(&self) -> Option<&str> {
        self.provider_used.as_deref()
    }
}

impl Drop for FailoverStream {
    fn drop(&mut self) {
        self.record.complete(|_| {});
    }
}

impl Stream for FailoverStream {
    type Item = Result<ChatChunk, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for FailoverStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverStream")
            .field("provider_used", &self.provider_used)
            .field("trace", &self.record.snapshot())
            .finish_non_exhaustive()
    }
}
