//! The LLMProvider trait

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::types::{ChatChunk, ChatRequest, ChatResponse, ProviderCapability, RequestContext};

/// Pull-based sequence of streamed chunks
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, ProviderError>> + Send>>;

/// Unified LLM Provider interface
///
/// Every backend the dispatcher can fail over between implements this trait.
/// Request/response translation is entirely the adapter's job; the router
/// treats each implementation as a black box that either answers or raises
/// a [`ProviderError`] tagged with enough information to classify it.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use litellm_dispatch::core::traits::LLMProvider;
/// use litellm_dispatch::core::types::{ChatRequest, ChatResponse, ProviderCapability, RequestContext};
/// use litellm_dispatch::ProviderError;
///
/// struct Echo;
///
/// #[async_trait]
/// impl LLMProvider for Echo {
///     fn name(&self) -> &'static str {
///         "echo"
///     }
///
///     fn capabilities(&self) -> &'static [ProviderCapability] {
///         &[ProviderCapability::ChatCompletion]
///     }
///
///     async fn chat_completion(
///         &self,
///         request: ChatRequest,
///         _context: RequestContext,
///     ) -> Result<ChatResponse, ProviderError> {
///         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(ChatResponse::new(request.model, last))
///     }
/// }
/// ```
#[async_trait]
pub trait LLMProvider: Send + Sync + 'static {
    /// Static identifier of the adapter, such as "openai" or "anthropic"
    fn name(&self) -> &'static str;

    /// Static capability list
    fn capabilities(&self) -> &'static [ProviderCapability];

    /// Check if streaming is supported
    fn supports_streaming(&self) -> bool {
        self.capabilities()
            .contains(&ProviderCapability::ChatCompletionStream)
    }

    /// Check if tools are supported
    fn supports_tools(&self) -> bool {
        self.capabilities()
            .contains(&ProviderCapability::ToolCalling)
    }

    /// Execute chat completion request
    async fn chat_completion(
        &self,
        request: ChatRequest,
        context: RequestContext,
    ) -> Result<ChatResponse, ProviderError>;

    /// Execute streaming chat completion request
    ///
    /// Opening the stream may fail like any other call; failures of
    /// individual chunks are yielded as `Err` items.
    async fn chat_completion_stream(
        &self,
        _request: ChatRequest,
        _context: RequestContext,
    ) -> Result<ChatStream, ProviderError> {
        Err(ProviderError::not_supported(self.name(), "streaming"))
    }
}
