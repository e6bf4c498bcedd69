//! Provider error type and configuration-time provider registry
//!
//! Concrete adapters live outside this crate; they implement
//! [`LLMProvider`](crate::core::traits::provider::LLMProvider) and raise
//! [`ProviderError`].

pub mod provider_registry;
pub mod unified_provider;

pub use provider_registry::ProviderRegistry;
pub use unified_provider::ProviderError;
