//! Utility modules
//!
//! - **error**: Crate-level error and result types
//! - **logging**: Structured logging setup

pub mod error;
pub mod logging;

pub use error::{ClientError, Result};
pub use logging::init_tracing;
