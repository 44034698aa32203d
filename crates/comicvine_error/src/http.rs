//! HTTP error types and retry classification.

/// Classified outcome of a failed physical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum HttpErrorKind {
    /// Upstream answered 429
    #[display("Rate limited (HTTP 429): {}", body)]
    RateLimited {
        /// Response body as returned by the server
        body: String,
    },
    /// Upstream answered 502
    #[display("Upstream unavailable (HTTP 502): {}", body)]
    UpstreamUnavailable {
        /// Response body as returned by the server
        body: String,
    },
    /// Any other 4xx status
    #[display("Client error (HTTP {}): {}", status, body)]
    Client {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },
    /// Any other non-success status
    #[display("Server error (HTTP {}): {}", status, body)]
    Server {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the server
        body: String,
    },
    /// Connection, timeout or body-read failure
    #[display("Transport error: {}", _0)]
    Transport(String),
}

impl HttpErrorKind {
    /// Classify a non-success status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::HttpErrorKind;
    ///
    /// let kind = HttpErrorKind::from_status(429, "slow down");
    /// assert!(kind.is_retryable());
    ///
    /// let kind = HttpErrorKind::from_status(404, "missing");
    /// assert_eq!(kind.status(), Some(404));
    /// assert!(!kind.is_retryable());
    /// ```
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            429 => HttpErrorKind::RateLimited { body },
            502 => HttpErrorKind::UpstreamUnavailable { body },
            400..=499 => HttpErrorKind::Client { status, body },
            _ => HttpErrorKind::Server { status, body },
        }
    }

    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HttpErrorKind::RateLimited { .. } | HttpErrorKind::UpstreamUnavailable { .. }
        )
    }

    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpErrorKind::RateLimited { .. } => Some(429),
            HttpErrorKind::UpstreamUnavailable { .. } => Some(502),
            HttpErrorKind::Client { status, .. } | HttpErrorKind::Server { status, .. } => {
                Some(*status)
            }
            HttpErrorKind::Transport(_) => None,
        }
    }
}

/// HTTP error carrying the request it belongs to.
///
/// # Examples
///
/// ```
/// use comicvine_error::{HttpError, HttpErrorKind};
///
/// let err = HttpError::new(
///     HttpErrorKind::from_status(404, "Object Not Found"),
///     "/issue/4000-1/",
///     "GET",
/// );
/// assert!(format!("{}", err).contains("GET /issue/4000-1/"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} {} failed: {} at line {} in {}", method, endpoint, kind, line, file)]
pub struct HttpError {
    /// The classified failure
    pub kind: HttpErrorKind,
    /// Resolved endpoint path of the failed request
    pub endpoint: String,
    /// HTTP method of the failed request
    pub method: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError at the current location.
    #[track_caller]
    pub fn new(kind: HttpErrorKind, endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            endpoint: endpoint.into(),
            method: method.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HttpErrorKind {
        &self.kind
    }
}

/// Trait for errors that support retry logic.
///
/// Only upstream throttling (429) and gateway failures (502) are retried.
/// Everything else is a terminal failure.
///
/// # Examples
///
/// ```
/// use comicvine_error::{HttpError, HttpErrorKind, RetryableError};
///
/// let err = HttpError::new(HttpErrorKind::from_status(502, ""), "/search/", "GET");
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for HttpError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
