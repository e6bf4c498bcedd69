//! Core traits
//!
//! The provider adapter contract the router executes against.

pub mod provider;

pub use provider::{ChatStream, LLMProvider, ProviderHandle};
