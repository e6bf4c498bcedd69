//! Scripted providers shared by the router tests

use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::core::providers::unified_provider::ProviderError;
use crate::core::router::policy::{JitterStrategy, RetryPolicy};
use crate::core::traits::provider::{ChatStream, LLMProvider, ProviderHandle};
use crate::core::types::{
    ChatChunk, ChatRequest, ChatResponse, ProviderCapability, RequestContext, user_message,
};

pub(super) const FULL: &[ProviderCapability] = &[
    ProviderCapability::ChatCompletion,
    ProviderCapability::ChatCompletionStream,
    ProviderCapability::ToolCalling,
];

pub(super) const CHAT_ONLY: &[ProviderCapability] = &[ProviderCapability::ChatCompletion];

/// One scripted reaction to an invocation
pub(super) enum Step {
    Reply(&'static str),
    Fail(ProviderError),
    Hang,
    Stream(Vec<Result<ChatChunk, ProviderError>>),
    StreamThenHang(Vec<Result<ChatChunk, ProviderError>>),
}

/// Provider that plays back a fixed script, then keeps replying "ok"
pub(super) struct ScriptedProvider {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    capabilities: &'static [ProviderCapability],
}

impl ScriptedProvider {
    pub(super) fn new(steps: Vec<Step>) -> Arc<Self> {
        Self::with_capabilities(steps, FULL)
    }

    pub(super) fn with_capabilities(
        steps: Vec<Step>,
        capabilities: &'static [ProviderCapability],
    ) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            calls: AtomicUsize::new(0),
            capabilities,
        })
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Option<Step> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.steps.lock().pop_front()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> &'static [ProviderCapability] {
        self.capabilities
    }

    async fn chat_completion(
        &self,
        request: ChatRequest,
        _context: RequestContext,
    ) -> Result<ChatResponse, ProviderError> {
        match self.next_step() {
            None => Ok(ChatResponse::new(request.model, "ok")),
            Some(Step::Reply(text)) => Ok(ChatResponse::new(request.model, text)),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => futures::future::pending().await,
            Some(Step::Stream(_)) | Some(Step::StreamThenHang(_)) => Err(
                ProviderError::invalid_request("scripted", "stream step on a sync call"),
            ),
        }
    }

    async fn chat_completion_stream(
        &self,
        request: ChatRequest,
        _context: RequestContext,
    ) -> Result<ChatStream, ProviderError> {
        let stream: ChatStream = match self.next_step() {
            None => Box::pin(stream::iter(vec![Ok(chunk(&request.model, "ok"))])),
            Some(Step::Reply(text)) => Box::pin(stream::iter(vec![Ok(chunk(&request.model, text))])),
            Some(Step::Fail(error)) => return Err(error),
            Some(Step::Hang) => futures::future::pending().await,
            Some(Step::Stream(items)) => Box::pin(stream::iter(items)),
            Some(Step::StreamThenHang(items)) => {
                Box::pin(futures::StreamExt::chain(stream::iter(items), stream::pending()))
            }
        };
        Ok(stream)
    }
}

pub(super) fn handle(id: &str, provider: &Arc<ScriptedProvider>) -> ProviderHandle {
    ProviderHandle::with_id(id, provider.clone())
}

pub(super) fn chunk(model: &str, delta: &str) -> ChatChunk {
    ChatChunk::delta("chunk", model, delta)
}

pub(super) fn request() -> ChatRequest {
    ChatRequest::new("gpt-4o", vec![user_message("Hello")])
}

/// Deterministic policy with short delays
pub(super) fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(max_attempts)
        .with_base_delay(Duration::from_millis(10))
        .with_max_delay(Duration::from_secs(1))
        .with_jitter(JitterStrategy::None)
}

pub(super) fn rate_limited() -> Step {
    Step::Fail(ProviderError::rate_limit("scripted", None))
}

pub(super) fn unavailable() -> Step {
    Step::Fail(ProviderError::provider_unavailable("scripted", "503 from upstream"))
}
