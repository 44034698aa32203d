//! JSON error types.

use std::fmt::Display;

/// A body or payload that is not the JSON the client expected.
///
/// Raised for success responses whose body does not parse, for request data
/// that is not a JSON object, and for resource ids missing from request data.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What could not be parsed or where it came from
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl JsonError {
    /// Create a new JsonError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::JsonError;
    ///
    /// let err = JsonError::new("Request data must be a JSON object, got [1,2]");
    /// assert!(err.message.starts_with("Request data"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A success response from `endpoint` whose body failed to parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::JsonError;
    ///
    /// let err = JsonError::invalid_response("/search/", "expected value at line 1 column 1");
    /// assert_eq!(
    ///     err.message,
    ///     "Failed to parse response from /search/: expected value at line 1 column 1"
    /// );
    /// ```
    #[track_caller]
    pub fn invalid_response(endpoint: impl Display, cause: impl Display) -> Self {
        Self::new(format!("Failed to parse response from {}: {}", endpoint, cause))
    }
}
