//! Error types for the ComicVine client.
//!
//! This crate provides the error taxonomy shared by every crate in the workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Retryable HTTP failures (429 and 502) are resolved by the retry policy and
//! only reach callers wrapped in [`RetriesExhaustedError`].
//!
//! # Examples
//!
//! ```
//! use comicvine_error::{AuthError, ComicVineResult};
//!
//! fn connect(token: &str) -> ComicVineResult<()> {
//!     if token.is_empty() {
//!         Err(AuthError::new("Missing API token"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(connect("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod auth;
mod config;
mod error;
mod http;
mod json;
mod rate_limit;
mod retry;

pub use auth::AuthError;
pub use config::ConfigError;
pub use error::{ComicVineError, ComicVineErrorKind, ComicVineResult};
pub use http::{HttpError, HttpErrorKind, RetryableError};
pub use json::JsonError;
pub use rate_limit::{RateLimitError, RateLimitErrorKind};
pub use retry::RetriesExhaustedError;
