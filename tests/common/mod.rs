//! Common test utilities for litellm-dispatch
//!
//! - Fixture providers with scripted failure patterns
//! - Request and policy factories
//! - Trace assertions

pub mod assertions;
pub mod fixtures;

pub use assertions::TraceAssertions;
pub use fixtures::{ChatRequestFactory, PolicyFactory};
pub use providers::{ChunkedProvider, FlakyProvider};
