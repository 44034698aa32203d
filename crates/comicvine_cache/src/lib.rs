//! Response caching with TTL support.
//!
//! This crate caches parsed response bodies of read-only requests, keyed by a
//! signature of method, path and parameters, reducing API calls against the
//! upstream's hourly allowance.

#![warn(missing_docs)]

mod cache;
mod signature;

pub use cache::{CacheConfig, CacheConfigBuilder, CacheEntry, ResponseCache};
pub use signature::RequestSignature;
