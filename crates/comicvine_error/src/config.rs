//! Configuration error types.

use std::fmt::Display;

/// Client configuration that cannot be loaded or used.
///
/// Covers unreadable or malformed config files and a base host/path pair
/// that does not form an absolute http(s) URL.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration: expected a value at line 1");
    /// assert!(err.to_string().starts_with("Configuration Error: Failed to parse"));
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

    /// A base URL assembled from `base_host` and `base_path` that is unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use comicvine_error::ConfigError;
    ///
    /// let err = ConfigError::invalid_base_url(
    ///     "comicvine.gamespot.com/api",
    ///     "relative URL without a base",
    /// );
    /// assert_eq!(
    ///     err.message,
    ///     "Invalid base URL comicvine.gamespot.com/api: relative URL without a base"
    /// );
    /// ```
    #[track_caller]
    pub fn invalid_base_url(base: impl Display, reason: impl Display) -> Self {
        Self::new(format!("Invalid base URL {}: {}", base, reason))
    }
}
