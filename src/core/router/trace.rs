//! Execution trace
//!
//! Ordered, append-only record of everything one dispatch did.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::Instant;

use super::classifier::ErrorClassification;
use crate::core::providers::unified_provider::ProviderError;

/// Dispatcher state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Dispatch created, no provider tried yet
    NotStarted,
    /// Attempting the provider at this index of the configured list
    TryingProvider(usize),
    /// A provider returned a result
    Succeeded,
    /// A streaming provider delivered its first chunk
    Committed,
    /// The committed stream failed after delivering output
    FailedPostCommit,
    /// Aborted on a fatal error
    FailedFatal,
    /// Every provider exhausted its retries
    FailedAll,
    /// Aborted by the caller's cancellation signal
    Cancelled,
}

impl DispatchState {
    /// Whether no further transition can follow
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::NotStarted | Self::TryingProvider(_))
    }
}

/// One provider invocation
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    /// Handle id of the provider attempted
    pub provider_id: String,
    /// 1-based, strictly increasing per provider
    pub attempt_number: u32,
    /// Failure, if the attempt failed
    pub error: Option<ProviderError>,
    /// How the failure was classified; `None` for cancellation and for
    /// failures after a stream committed
    pub classification: Option<ErrorClassification>,
    /// Wall time spent in the attempt, excluding backoff
    pub duration: Duration,
}

impl AttemptRecord {
    /// Whether the attempt succeeded
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Ordered record of the attempts made during one dispatch
///
/// Exclusively owned by the call that produced it; handed to the caller
/// with the result or attached to the returned error.
#[derive(Debug, Clone)]
pub struct ExecutionTrace {
    request_id: String,
    started_at: DateTime<Utc>,
    streaming: bool,
    attempts: Vec<AttemptRecord>,
    transitions: Vec<DispatchState>,
    provider_used: Option<String>,
    elapsed: Duration,
    start: Instant,
}

impl ExecutionTrace {
    /// Start a trace for request `request_id`
    pub fn new(request_id: impl Into<String>, streaming: bool) -> Self {
        Self {
            request_id: request_id.into(),
            started_at: Utc::now(),
            streaming,
            attempts: Vec::new(),
            transitions: vec![DispatchState::NotStarted],
            provider_used: None,
            elapsed: Duration::ZERO,
            start: Instant::now(),
        }
    }

    pub(crate) fn record_attempt(&mut self, record: AttemptRecord) {
        self.attempts.push(record);
    }

    pub(crate) fn transition(&mut self, state: DispatchState) {
        self.transitions.push(state);
    }

    pub(crate) fn set_provider_used(&mut self, provider_id: &str) {
        self.provider_used = Some(provider_id.to_string());
    }

    /// Attach a post-commit stream failure to the committed attempt
    pub(crate) fn fail_after_commit(&mut self, error: ProviderError) {
        if let Some(record) = self.attempts.last_mut() {
            record.error = Some(error);
        }
        self.transitions.push(DispatchState::FailedPostCommit);
    }

    pub(crate) fn finalize(&mut self) {
        self.elapsed = self.start.elapsed();
    }

    /// Request the trace belongs to
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Wall clock time the dispatch started
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whether this was a streaming dispatch
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// All attempts in the order they were made
    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    /// Attempts made against one provider
    pub fn attempts_for<'a>(
        &'a self,
        provider_id: &'a str,
    ) -> impl Iterator<Item = &'a AttemptRecord> + 'a {
        self.attempts
            .iter()
            .filter(move |record| record.provider_id == provider_id)
    }

    /// Total number of attempts across all providers
    pub fn total_attempts(&self) -> usize {
        self.attempts.len()
    }

    /// Every state the dispatcher passed through
    pub fn transitions(&self) -> &[DispatchState] {
        &self.transitions
    }

    /// Last state reached
    pub fn final_state(&self) -> DispatchState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(DispatchState::NotStarted)
    }

    /// Provider that served the call; set only on success or commitment
    pub fn provider_used(&self) -> Option<&str> {
        self.provider_used.as_deref()
    }

    /// Distinct providers attempted, in order
    pub fn providers_tried(&self) -> Vec<&str> {
        let mut tried: Vec<&str> = Vec::new();
        for record in &self.attempts {
            if !tried.contains(&record.provider_id.as_str()) {
                tried.push(&record.provider_id);
            }
        }
        tried
    }

    /// Whether a provider other than the first one tried served the call
    pub fn used_fallback(&self) -> bool {
        match (self.provider_used(), self.providers_tried().first()) {
            (Some(used), Some(first)) => used != *first,
            _ => false,
        }
    }

    /// Total dispatch latency, including backoff and, for streams, the time
    /// until the stream ended; zero until finalized
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
