//! Router tests module
//!
//! Covers classification, per-provider retry, ordered failover and stream
//! commitment against scripted providers.

mod support;
