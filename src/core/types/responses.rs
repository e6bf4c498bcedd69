//! Chat response types

use serde::{Deserialize, Serialize};

/// Completion reason
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop
    Stop,
    /// Hit the token limit
    Length,
    /// Model requested a tool call
    ToolCalls,
    /// Filtered by the provider
    ContentFilter,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
    /// Total tokens
    pub total_tokens: u32,
}

impl Usage {
    /// Build usage from prompt/completion counts
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response ID
    pub id: String,

    /// Model used
    pub model: String,

    /// Assistant content
    pub content: String,

    /// Completion reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Usage statistics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Create a finished response
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
            model: model.into(),
            content: content.into(),
            finish_reason: Some(FinishReason::Stop),
            usage: None,
        }
    }
}

/// Streaming chat chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatChunk {
    /// Response ID, shared by every chunk of one stream
    pub id: String,

    /// Model used
    pub model: String,

    /// Content delta
    pub delta: String,

    /// Set on the last chunk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl ChatChunk {
    /// Create a content delta chunk
    pub fn delta(id: impl Into<String>, model: impl Into<String>, delta: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model: model.into(),
            delta: delta.into(),
            finish_reason: None,
        }
    }

    /// Mark this chunk as the final one
    pub fn finished(mut self, reason: FinishReason) -> Self {
        self.finish_reason = Some(reason);
        self
    }
}
