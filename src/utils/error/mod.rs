//! Error handling for the dispatch client
//!
//! Provider failures are modelled by [`ProviderError`] and dispatch outcomes
//! by [`DispatchError`]; this module holds the crate-level error used at the
//! configuration and setup boundary.

#![allow(missing_docs)]

use crate::core::router::error::DispatchError;
use thiserror::Error;


/// Result type alias for the client
pub type Result<T> = std::result::Result<T, ClientError>;

/// Crate-level error
#[derive(Error, Debug)]
pub enum ClientError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configured provider is not registered
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Dispatch errors
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ClientError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came out of a dispatch
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}
