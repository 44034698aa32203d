//! Authentication error types.

/// Raised when the client is constructed without a usable API token.
///
/// This error is produced before any network activity takes place.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Auth Error: {} at line {} in {}", message, line, file)]
pub struct AuthError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl AuthError {
    /// Create a new AuthError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::AuthError;
    ///
    /// let err = AuthError::new("Missing API token");
    /// assert!(err.message.contains("token"));
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
}
