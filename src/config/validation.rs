//! Configuration validation

use super::DispatchConfig;
use crate::utils::error::{ClientError, Result};
use std::collections::HashSet;

impl DispatchConfig {
    /// Check the provider order and retry policy
    pub fn validate(&self) -> Result<()> {
        if self.providers.is_empty() {
            return Err(ClientError::Validation(
                "at least one provider must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.providers.len());
        for name in &self.providers {
            if name.trim().is_empty() {
                return Err(ClientError::Validation(
                    "provider names must not be empty".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(ClientError::Validation(format!(
                    "provider '{}' is listed more than once",
                    name
                )));
            }
        }

        self.retry.validate()
    }
}
