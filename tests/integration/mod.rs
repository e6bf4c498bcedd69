//! Integration tests for litellm-dispatch
//!
//! Drive the public API with fixture providers; no network access.

pub mod config_tests;
pub mod failover_tests;
pub mod streaming_tests;
