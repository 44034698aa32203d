//! Limiter configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the [`Limiter`](crate::Limiter).
///
/// # Example
///
/// ```
/// use comicvine_rate_limit::LimiterConfig;
///
/// let config = LimiterConfig::default().with_max_requests_per_second(Some(1));
/// assert_eq!(*config.max_requests_per_second(), Some(1));
/// assert_eq!(*config.special_reset_floor_ms(), 250);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct LimiterConfig {
    /// Client-side pacing across all buckets; `None` sends as fast as buckets allow
    #[serde(default)]
    max_requests_per_second: Option<u32>,

    /// Endpoint template suffixes whose reset time is floored
    #[serde(default = "default_special_reset_suffixes")]
    special_reset_suffixes: Vec<String>,

    /// Minimum reset delay for the special endpoints (milliseconds)
    #[serde(default = "default_special_reset_floor_ms")]
    special_reset_floor_ms: u64,

    /// Global halt length when the server omits a retry-after hint (milliseconds)
    #[serde(default = "default_global_retry_after_ms")]
    default_global_retry_after_ms: u64,
}

fn default_special_reset_suffixes() -> Vec<String> {
    vec!["/reactions/:id".to_string()]
}

fn default_special_reset_floor_ms() -> u64 {
    250
}

fn default_global_retry_after_ms() -> u64 {
    1000
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            max_requests_per_second: None,
            special_reset_suffixes: default_special_reset_suffixes(),
            special_reset_floor_ms: default_special_reset_floor_ms(),
            default_global_retry_after_ms: default_global_retry_after_ms(),
        }
    }
}

impl LimiterConfig {
    /// Reset floor for a bucket key, if the key names a specially limited endpoint.
    pub fn reset_floor_for(&self, key: &str) -> Option<std::time::Duration> {
        self.special_reset_suffixes
            .iter()
            .any(|suffix| key.ends_with(suffix.as_str()))
            .then(|| std::time::Duration::from_millis(self.special_reset_floor_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_floor_only_for_special_suffix() {
        let config = LimiterConfig::default();
        assert_eq!(
            config.reset_floor_for("/channels/:id/messages/:id/reactions/:id"),
            Some(std::time::Duration::from_millis(250))
        );
        assert_eq!(config.reset_floor_for("/search/"), None);
    }

    #[test]
    fn test_builder_defaults() {
        let config = LimiterConfigBuilder::default()
            .max_requests_per_second(Some(5))
            .build()
            .unwrap();
        assert_eq!(*config.max_requests_per_second(), Some(5));
        assert_eq!(*config.default_global_retry_after_ms(), 1000);
    }
}
