//! Terminal error raised once the attempt budget is spent.

use crate::HttpError;

/// Every permitted attempt failed with a retryable error.
///
/// # Examples
///
/// ```
/// use comicvine_error::{HttpError, HttpErrorKind, RetriesExhaustedError};
///
/// let last = HttpError::new(HttpErrorKind::from_status(429, ""), "/search/", "GET");
/// let err = RetriesExhaustedError::new(3, last);
/// assert_eq!(err.attempts, 3);
/// assert!(format!("{}", err).contains("after 3 attempts"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request failed after {} attempts: {} at line {} in {}", attempts, last, line, file)]
pub struct RetriesExhaustedError {
    /// Number of physical attempts made
    pub attempts: u32,
    /// The failure observed on the final attempt
    #[error(source)]
    pub last: HttpError,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RetriesExhaustedError {
    /// Create a new RetriesExhaustedError at the current location.
    #[track_caller]
    pub fn new(attempts: u32, last: HttpError) -> Self {
        let location = std::panic::Location::caller();
        Self {
            attempts,
            last,
            line: location.line(),
            file: location.file(),
        }
    }
}
