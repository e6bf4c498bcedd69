//! Core LLM Provider trait definitions
//!
//! Defines the uniform invoke contract every provider adapter implements.
//!
//! # Module Organization
//!
//! - `llm_provider` - The LLMProvider trait definition
//! - `handle` - ProviderHandle struct used by the dispatcher

mod handle;
mod llm_provider;

pub use handle::ProviderHandle;
pub use llm_provider::{ChatStream, LLMProvider};
