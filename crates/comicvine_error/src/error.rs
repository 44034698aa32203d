//! Top-level error wrapper types.

use crate::{AuthError, ConfigError, HttpError, JsonError, RateLimitError, RetriesExhaustedError};

/// Every failure a caller of the client can observe.
///
/// # Examples
///
/// ```
/// use comicvine_error::{ComicVineError, ComicVineErrorKind, AuthError};
///
/// let err: ComicVineError = AuthError::new("Missing API token").into();
/// assert!(matches!(err.kind(), ComicVineErrorKind::Auth(_)));
/// assert!(format!("{}", err).contains("Auth Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ComicVineErrorKind {
    /// Missing or empty API token
    #[from(AuthError)]
    Auth(AuthError),
    /// Terminal HTTP or transport failure
    #[from(HttpError)]
    Http(HttpError),
    /// Retryable failures exhausted the attempt budget
    #[from(RetriesExhaustedError)]
    RetriesExhausted(RetriesExhaustedError),
    /// Limiter queue failure
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// ComicVine error with kind discrimination.
///
/// # Examples
///
/// ```
/// use comicvine_error::{ComicVineResult, ConfigError};
///
/// fn might_fail() -> ComicVineResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("ComicVine Error: {}", _0)]
pub struct ComicVineError(Box<ComicVineErrorKind>);

impl ComicVineError {
    /// Create a new error from a kind.
    pub fn new(kind: ComicVineErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ComicVineErrorKind {
        &self.0
    }

    /// The HTTP failure behind this error, if it came from a retryable class.
    ///
    /// Used by the retry policy to decide whether another attempt is allowed.
    pub fn as_retryable(&self) -> Option<&HttpError> {
        match self.kind() {
            ComicVineErrorKind::Http(err) if err.kind.is_retryable() => Some(err),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to ComicVineErrorKind
impl<T> From<T> for ComicVineError
where
    T: Into<ComicVineErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for ComicVine operations.
pub type ComicVineResult<T> = std::result::Result<T, ComicVineError>;
