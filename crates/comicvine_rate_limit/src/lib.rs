//! Per-resource request serialization and rate-limit handling.
//!
//! Every physical request runs on the turn of its bucket. A bucket is keyed by
//! the endpoint template, owns the remaining allowance and reset time reported
//! by the server, and is drained by a single worker task so that at most one
//! request per bucket is in flight. Buckets run independently of each other,
//! except for the global halt which stops all of them.
//!
//! ```rust,ignore
//! use comicvine_rate_limit::{Limiter, LimiterConfig};
//!
//! let limiter = Limiter::new(LimiterConfig::default());
//! let status = limiter
//!     .enqueue("/search/", |turn| async move {
//!         let response = client.get(url).send().await?;
//!         turn.apply_headers(response.headers());
//!         Ok::<_, reqwest::Error>(response.status())
//!     })
//!     .await??;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bucket;
mod config;
mod global;
mod headers;
mod limiter;

pub use bucket::{Bucket, BucketSnapshot};
pub use config::{LimiterConfig, LimiterConfigBuilder};
pub use global::GlobalHalt;
pub use headers::{MAX_WAIT, RateLimitHeaders};
pub use limiter::{BucketTurn, Limiter};
