//! Provider Registry
//!
//! Configuration-time registry mapping names to [`ProviderHandle`]s.
//!
//! The registry exists only at the configuration boundary: it is consulted
//! once to resolve an ordered provider list, and the resulting handles are
//! injected into the dispatcher. Dispatch itself never reads it.

use crate::core::traits::provider::ProviderHandle;
use crate::utils::error::{ClientError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Provider registry keyed by handle id
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, ProviderHandle>>,
}

impl ProviderRegistry {
    /// Create new provider registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous handle with the same id
    pub fn register(&self, handle: ProviderHandle) -> Option<ProviderHandle> {
        self.providers.write().insert(handle.id().to_string(), handle)
    }

    /// Get provider by name
    pub fn get(&self, name: &str) -> Option<ProviderHandle> {
        self.providers.read().get(name).cloned()
    }

    /// Check if provider is registered
    pub fn contains(&self, name: &str) -> bool {
        self.providers.read().contains_key(name)
    }

    /// Remove provider
    pub fn remove(&self, name: &str) -> Option<ProviderHandle> {
        self.providers.write().remove(name)
    }

    /// List all registered provider names, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Get provider count
    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }

    /// Resolve an ordered list of names into handles, preserving order
    pub fn resolve(&self, names: &[String]) -> Result<Vec<ProviderHandle>> {
        let providers = self.providers.read();
        names
            .iter()
            .map(|name| {
                providers
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ClientError::UnknownProvider(name.clone()))
            })
            .collect()
    }
}
