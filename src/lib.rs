//! # LiteLLM Dispatch
//!
//! The resilient execution core of a multi-provider LLM client.
//!
//! A request is sent to an ordered list of providers. Transient failures
//! are retried against the same provider with exponential backoff, a
//! provider that keeps failing is abandoned for the next one, and fatal
//! errors such as bad credentials stop everything immediately. Streamed
//! responses are guarded so that once the first chunk has reached the
//! caller no other provider is ever tried.
//!
//! ## Features
//!
//! - **Error classification**: Every [`ProviderError`] is fatal or retryable
//! - **Bounded retry**: Exponential backoff with jitter, honoring provider
//!   retry hints
//! - **Ordered failover**: Providers tried strictly in configured order
//! - **Streaming commitment**: No failover after the first delivered chunk
//! - **Execution trace**: Every attempt, delay source and state transition
//!   recorded per request
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use litellm_dispatch::{
//!     ChatRequest, ChatResponse, FailoverDispatcher, LLMProvider, ProviderCapability,
//!     ProviderError, ProviderHandle, RequestContext, RetryPolicy, user_message,
//! };
//!
//! struct Primary;
//!
//! #[async_trait]
//! impl LLMProvider for Primary {
//!     fn name(&self) -> &'static str {
//!         "primary"
//!     }
//!
//!     fn capabilities(&self) -> &'static [ProviderCapability] {
//!         &[ProviderCapability::ChatCompletion]
//!     }
//!
//!     async fn chat_completion(
//!         &self,
//!         request: ChatRequest,
//!         _context: RequestContext,
//!     ) -> Result<ChatResponse, ProviderError> {
//!         Ok(ChatResponse::new(request.model, "hello"))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = FailoverDispatcher::new(
//!         vec![ProviderHandle::new(Primary)],
//!         RetryPolicy::new(3),
//!     )?;
//!
//!     let request = ChatRequest::new("gpt-4o", vec![user_message("Hi")]);
//!     let response = dispatcher.complete(request).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]

pub mod config;
pub mod core;
pub mod utils;

pub use config::DispatchConfig;
pub use core::providers::{ProviderError, ProviderRegistry};
pub use core::router::{
    AggregatedFailure, AttemptRecord, DispatchError, DispatchObserver, DispatchOutcome,
    DispatchState, ErrorClassification, ErrorClassifier, ExecuteError, ExecutionTrace,
    FailoverDispatcher, FailoverStream, JitterStrategy, NoopObserver, RetryExecutor,
    RetryExhausted, RetryPolicy, StreamError, StreamingGuard, classify,
};
pub use core::traits::{ChatStream, LLMProvider, ProviderHandle};
pub use core::types::{
    ChatChunk, ChatMessage, ChatRequest, ChatResponse, FinishReason, MessageRole,
    ProviderCapability, RequestContext, Tool, Usage, assistant_message, system_message,
    user_message,
};
pub use utils::error::{ClientError, Result};
pub use utils::logging::init_tracing;
