//! Client configuration.

use comicvine_cache::CacheConfig;
use comicvine_error::{AuthError, ComicVineError, ComicVineResult, ConfigError};
use comicvine_rate_limit::LimiterConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../comicvine.toml");

/// Settings for a [`RequestHandler`](crate::RequestHandler).
///
/// Every field has a default, so a config can be built from a token alone.
/// Nested tables configure the response cache (`[cache]`) and the limiter
/// (`[limiter]`).
///
/// # Example
///
/// ```
/// use comicvine::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("my-api-key")
///     .with_base_host("http://localhost:8080")
///     .with_cache_ttl(Duration::from_millis(1_500));
///
/// assert_eq!(config.base_host(), "http://localhost:8080");
/// assert_eq!(*config.cache().default_ttl_ms(), 1_500);
/// assert_eq!(*config.upstream_backoff_ms(), 250);
/// ```
#[derive(
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct ClientConfig {
    /// API key sent with every request
    #[serde(default)]
    #[setters(into)]
    #[builder(setter(into))]
    token: String,

    /// Scheme and host of the upstream, without a trailing path
    #[serde(default = "default_base_host")]
    #[setters(into)]
    #[builder(setter(into))]
    base_host: String,

    /// Path prefix shared by every endpoint
    #[serde(default = "default_base_path")]
    #[setters(into)]
    #[builder(setter(into))]
    base_path: String,

    /// Timeout for one physical request (seconds)
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    #[setters(into)]
    #[builder(setter(into))]
    user_agent: String,

    /// Base delay before resubmitting after a 502 (milliseconds); 0 resubmits immediately
    #[serde(default = "default_upstream_backoff_ms")]
    upstream_backoff_ms: u64,

    /// Response cache settings
    #[serde(default)]
    cache: CacheConfig,

    /// Bucket and pacing settings
    #[serde(default)]
    limiter: LimiterConfig,
}

fn default_base_host() -> String {
    crate::endpoints::BASE_HOST.to_string()
}

fn default_base_path() -> String {
    crate::endpoints::BASE_PATH.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("comicvine-rs/{}", env!("CARGO_PKG_VERSION"))
}

fn default_upstream_backoff_ms() -> u64 {
    250
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_host: default_base_host(),
            base_path: default_base_path(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            upstream_backoff_ms: default_upstream_backoff_ms(),
            cache: CacheConfig::default(),
            limiter: LimiterConfig::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("base_host", &self.base_host)
            .field("base_path", &self.base_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("upstream_backoff_ms", &self.upstream_backoff_ms)
            .field("cache", &self.cache)
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl ClientConfig {
    /// Defaults with the given API token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Override the default time-to-live of cached responses.
    ///
    /// Stored in whole milliseconds; a sub-millisecond remainder rounds up so
    /// a non-zero TTL never becomes zero.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        self.cache = self.cache.with_default_ttl_ms(ttl_ms);
        self
    }

    /// Load configuration from a specific file path.
    ///
    /// Keys missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ComicVineResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ComicVineError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ComicVineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: environment > user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (comicvine.toml shipped with library)
    /// 2. User config in home directory (~/.config/comicvine/comicvine.toml)
    /// 3. User config in current directory (./comicvine.toml)
    /// 4. `COMICVINE_*` environment variables, `__` separating nested keys
    ///    (`COMICVINE_TOKEN`, `COMICVINE_CACHE__DEFAULT_TTL_MS`)
    ///
    /// User config files are optional and will be silently skipped if not found.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use comicvine::ClientConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClientConfig::load()?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> ComicVineResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/comicvine/comicvine.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("comicvine").required(false))
            .add_source(
                Environment::with_prefix("COMICVINE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder
            .build()
            .map_err(|e| {
                ComicVineError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ComicVineError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check the settings a handler cannot run without.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] for an empty or blank token, and [`ConfigError`]
    /// when the base host and path do not form an absolute URL.
    pub fn validate(&self) -> ComicVineResult<()> {
        if self.token.trim().is_empty() {
            Err(AuthError::new("Missing API token"))?
        }
        self.base_url()?;
        Ok(())
    }

    /// Base host joined with the base path, without a trailing slash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the result is not an absolute http(s) URL.
    pub fn base_url(&self) -> ComicVineResult<String> {
        let base = format!(
            "{}/{}",
            self.base_host.trim_end_matches('/'),
            self.base_path.trim_matches('/')
        );
        let base = base.trim_end_matches('/').to_string();

        let parsed = reqwest::Url::parse(&base)
            .map_err(|e| ConfigError::invalid_base_url(&base, e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            Err(ConfigError::invalid_base_url(
                &base,
                format!("unsupported scheme {}", parsed.scheme()),
            ))?
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_joins_host_and_path() {
        let config = ClientConfig::new("key").with_base_host("http://127.0.0.1:9000/");
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:9000/api");

        let config = config.with_base_path("");
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_blank_token() {
        let err = ClientConfig::new("   ").validate().unwrap_err();
        assert!(matches!(
            err.kind(),
            comicvine_error::ComicVineErrorKind::Auth(_)
        ));
    }

    #[test]
    fn test_validate_rejects_relative_host() {
        let err = ClientConfig::new("key")
            .with_base_host("comicvine.gamespot.com")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            comicvine_error::ComicVineErrorKind::Config(_)
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let err = ClientConfig::new("key")
            .with_base_host("ftp://comicvine.gamespot.com")
            .validate()
            .unwrap_err();
        match err.kind() {
            comicvine_error::ComicVineErrorKind::Config(e) => {
                assert_eq!(
                    e.message,
                    "Invalid base URL ftp://comicvine.gamespot.com/api: unsupported scheme ftp"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", ClientConfig::new("secret-key"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_bundled_defaults_parse() {
        let config: ClientConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
