//! ComicVine - rate-limited, cached REST client
//!
//! A client for the ComicVine comics database API. Every call goes through
//! one pipeline that keeps the client inside the upstream's limits:
//!
//! - **Per-resource serialization**: requests sharing an endpoint template run
//!   one at a time, in order, and wait for the server-reported reset when the
//!   allowance is spent
//! - **Global halt**: a server-signalled global limit pauses every resource
//! - **Response cache**: read-only requests are answered from a TTL cache
//! - **Bounded retry**: 429 and 502 responses are resubmitted, at most three
//!   physical attempts in total
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use comicvine::ComicVine;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ComicVine::new(std::env::var("API_KEY")?)?;
//!
//!     let results = client
//!         .search()
//!         .search_comic(json!({"query": "batman", "resources": "volume"}))
//!         .await?;
//!
//!     println!("{}", results.payload());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `comicvine_error` - Error types
//! - `comicvine_core` - Request descriptors, endpoints, responses, telemetry
//! - `comicvine_rate_limit` - Per-bucket queues and rate-limit header handling
//! - `comicvine_cache` - TTL response cache
//!
//! This crate composes them into [`RequestHandler`] and re-exports the types
//! callers need.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
pub mod endpoints;
mod executor;
mod handler;
pub mod methods;
mod retry;

pub use client::ComicVine;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use executor::{RawResponse, RequestExecutor};
pub use handler::RequestHandler;
pub use retry::{MAX_ATTEMPTS, RetryPolicy};

// Re-export the foundation crates
pub use comicvine_cache::{CacheConfig, CacheEntry, RequestSignature, ResponseCache};
pub use comicvine_core::*;
pub use comicvine_error::*;
pub use comicvine_rate_limit::{BucketSnapshot, Limiter, LimiterConfig, MAX_WAIT, RateLimitHeaders};
