//! Provider handle for the dispatcher
//!
//! Type-erased, immutable reference to a configured provider.

use std::fmt;
use std::sync::Arc;

use super::llm_provider::{ChatStream, LLMProvider};
use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{ChatRequest, ChatResponse, RequestContext};

/// Provider handle for the dispatcher
///
/// Wraps a provider adapter together with the identifier it is known by in
/// traces and the capability flags the dispatcher gates on. Handles are
/// built at configuration time and never mutated during dispatch; cloning
/// only bumps a reference count, so one ordered list can be shared by any
/// number of concurrent calls.
#[derive(Clone)]
pub struct ProviderHandle {
    id: Arc<str>,
    provider: Arc<dyn LLMProvider>,
    supports_streaming: bool,
    supports_tools: bool,
}

impl ProviderHandle {
    /// Create a handle whose id is the adapter name
    pub fn new<P>(provider: P) -> Self
    where
        P: LLMProvider,
    {
        let id = provider.name();
        Self::with_id(id, Arc::new(provider))
    }

    /// Create a handle with an explicit id around a shared adapter
    ///
    /// Capability flags are snapshotted from the adapter.
    pub fn with_id(id: impl Into<String>, provider: Arc<dyn LLMProvider>) -> Self {
        let supports_streaming = provider.supports_streaming();
        let supports_tools = provider.supports_tools();
        Self {
            id: Arc::from(id.into()),
            provider,
            supports_streaming,
            supports_tools,
        }
    }

    /// Override the streaming capability flag
    pub fn streaming(mut self, enabled: bool) -> Self {
        self.supports_streaming = enabled;
        self
    }

    /// Override the tool calling capability flag
    pub fn tools(mut self, enabled: bool) -> Self {
        self.supports_tools = enabled;
        self
    }

    /// Handle identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the wrapped adapter
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Whether streaming calls may be routed here
    pub fn supports_streaming(&self) -> bool {
        self.supports_streaming
    }

    /// Whether requests carrying tools may be routed here
    pub fn supports_tools(&self) -> bool {
        self.supports_tools
    }

    /// Whether this handle can serve `request`
    pub fn can_serve(&self, request: &ChatRequest, streaming: bool) -> bool {
        self.missing_capability(request, streaming).is_none()
    }

    /// First capability `request` needs that this handle lacks
    pub fn missing_capability(&self, request: &ChatRequest, streaming: bool) -> Option<&'static str> {
        if streaming && !self.supports_streaming {
            Some("streaming")
        } else if request.requires_tools() && !self.supports_tools {
            Some("tools")
        } else {
            None
        }
    }

    /// Invoke the adapter synchronously
    pub async fn chat_completion(
        &self,
        request: ChatRequest,
        context: RequestContext,
    ) -> Result<ChatResponse, ProviderError> {
        self.provider.chat_completion(request, context).await
    }

    /// Open a stream on the adapter
    pub async fn chat_completion_stream(
        &self,
        request: ChatRequest,
        context: RequestContext,
    ) -> Result<ChatStream, ProviderError> {
        self.provider.chat_completion_stream(request, context).await
    }
}

impl fmt::Debug for ProviderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderHandle")
            .field("id", &self.id)
            .field("provider", &self.provider.name())
            .field("supports_streaming", &self.supports_streaming)
            .field("supports_tools", &self.supports_tools)
            .finish()
    }
}
