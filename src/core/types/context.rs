//! Request context types

use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Per-call context handed to every provider invocation
///
/// The cancellation token is the only way to abort a call in flight. It is
/// checked before each attempt, during backoff sleeps and between streamed
/// chunks.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Request ID
    pub request_id: String,
    /// Cancellation signal for the whole logical call
    pub cancellation: CancellationToken,
    /// Extra metadata
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            cancellation: CancellationToken::new(),
            metadata: HashMap::new(),
        }
    }
}

impl RequestContext {
    /// Create new request context
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Set request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Whether the call has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
