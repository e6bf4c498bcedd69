//! Core functionality for the dispatch client
//!
//! - `types` - Requests, responses, chunks and the per-call context
//! - `traits` - The provider adapter contract
//! - `providers` - Provider errors and the configuration-time registry
//! - `router` - Classification, retry, failover and stream commitment

pub mod providers;
pub mod router;
pub mod traits;
pub mod types;
