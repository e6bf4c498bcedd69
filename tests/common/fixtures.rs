//! Test fixtures and data factories

use litellm_dispatch::{ChatRequest, JitterStrategy, RetryPolicy, Tool, system_message, user_message};
use std::time::Duration;

/// Factory for chat requests
pub struct ChatRequestFactory;

impl ChatRequestFactory {
    /// Simple single-turn request
    pub fn simple() -> ChatRequest {
        ChatRequest::new("gpt-4o-mini", vec![user_message("Hello, how are you?")])
    }

    /// Request with a system prompt
    pub fn with_system() -> ChatRequest {
        ChatRequest::new(
            "gpt-4o-mini",
            vec![
                system_message("You are a helpful assistant."),
                user_message("What is the capital of France?"),
            ],
        )
        .with_temperature(0.2)
        .with_max_tokens(64)
    }

    /// Request that needs tool calling
    pub fn with_tools() -> ChatRequest {
        Self::simple().with_tools(vec![Tool {
            name: "get_weather".to_string(),
            description: Some("Current weather for a city".to_string()),
            parameters: serde_json::json!({
                "type": "object",
                "properties": { "city": { "type": "string" } },
                "required": ["city"]
            }),
        }])
    }
}

/// Factory for retry policies
pub struct PolicyFactory;

impl PolicyFactory {
    /// Deterministic policy with millisecond delays
    pub fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts)
            .with_base_delay(Duration::from_millis(5))
            .with_max_delay(Duration::from_millis(200))
            .with_jitter(JitterStrategy::None)
    }
}
