//! Interpretation of rate-limit hints in response headers.
//!
//! The upstream reports its limits with:
//! - `x-ratelimit-limit`: calls allowed in the current window
//! - `x-ratelimit-remaining`: calls left in the current window
//! - `x-ratelimit-reset`: epoch seconds (server clock) when the window resets
//! - `x-ratelimit-global`: present when every route is throttled
//! - `retry_after` (milliseconds) or `retry-after` (seconds): global halt length
//! - `date`: server clock, used to correct for skew against the local clock

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest wait any header may impose on a bucket or on the global halt.
pub const MAX_WAIT: Duration = Duration::from_secs(60 * 60);

/// Rate-limit hints extracted from one response.
///
/// # Example
///
/// ```
/// use comicvine_rate_limit::RateLimitHeaders;
/// use reqwest::header::{HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
/// headers.insert("x-ratelimit-limit", HeaderValue::from_static("200"));
///
/// let hints = RateLimitHeaders::parse(&headers, 0);
/// assert_eq!(hints.remaining, Some(0));
/// assert_eq!(hints.limit, Some(200));
/// assert!(!hints.global);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `x-ratelimit-global` was present
    pub global: bool,
    /// Global halt length requested by the server
    pub retry_after: Option<Duration>,
    /// Window reset as epoch milliseconds on the server clock
    pub reset_epoch_ms: Option<i64>,
    /// Calls left in the current window
    pub remaining: Option<u32>,
    /// Calls allowed per window
    pub limit: Option<u32>,
    /// Local clock minus server clock, zero when `date` is missing or unparseable
    pub clock_offset_ms: i64,
}

impl RateLimitHeaders {
    /// Extract hints using the current wall clock for skew correction.
    #[instrument(skip(headers))]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let hints = Self::parse(headers, Utc::now().timestamp_millis());
        debug!(
            global = hints.global,
            remaining = ?hints.remaining,
            limit = ?hints.limit,
            reset_epoch_ms = ?hints.reset_epoch_ms,
            clock_offset_ms = hints.clock_offset_ms,
            "Parsed rate limit headers"
        );
        hints
    }

    /// Extract hints given the local wall clock in epoch milliseconds.
    pub fn parse(headers: &HeaderMap, local_now_ms: i64) -> Self {
        let clock_offset_ms = header_str(headers, "date")
            .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
            .map(|server| local_now_ms - server.timestamp_millis())
            .unwrap_or(0);

        let max_ms = MAX_WAIT.as_millis() as f64;
        let retry_after = parse_header_f64(headers, "retry_after")
            .or_else(|| parse_header_f64(headers, "retry-after").map(|secs| secs * 1000.0))
            .map(|ms| Duration::from_millis(ms.clamp(0.0, max_ms).round() as u64));

        Self {
            global: headers.contains_key("x-ratelimit-global"),
            retry_after,
            reset_epoch_ms: parse_header_f64(headers, "x-ratelimit-reset")
                .map(|secs| (secs * 1000.0).round() as i64),
            remaining: parse_header_u32(headers, "x-ratelimit-remaining"),
            limit: parse_header_u32(headers, "x-ratelimit-limit"),
            clock_offset_ms,
        }
    }

    /// Time from `local_now_ms` until the window resets, on the local clock.
    ///
    /// The server reports the reset on its own clock, so the skew measured from
    /// the `date` header is added back before comparing with local time. A reset
    /// in the past yields zero and the result never exceeds [`MAX_WAIT`].
    ///
    /// # Example
    ///
    /// ```
    /// use comicvine_rate_limit::RateLimitHeaders;
    /// use std::time::Duration;
    ///
    /// let hints = RateLimitHeaders {
    ///     reset_epoch_ms: Some(10_000),
    ///     clock_offset_ms: 500, // local clock runs 500ms ahead
    ///     ..Default::default()
    /// };
    /// assert_eq!(hints.reset_delay(9_000), Some(Duration::from_millis(1_500)));
    /// assert_eq!(hints.reset_delay(20_000), Some(Duration::ZERO));
    /// ```
    pub fn reset_delay(&self, local_now_ms: i64) -> Option<Duration> {
        let reset = self.reset_epoch_ms?;
        // `date` has 1s resolution, so the correction may add up to ~1s of delay.
        let local_reset = reset.saturating_add(self.clock_offset_ms);
        let delay = u64::try_from(local_reset.saturating_sub(local_now_ms)).unwrap_or(0);
        Some(Duration::from_millis(delay).min(MAX_WAIT))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, key: &str) -> Option<&'a str> {
    headers.get(key)?.to_str().ok().map(str::trim)
}

/// Helper to parse u32 from header value.
fn parse_header_u32(headers: &HeaderMap, key: &str) -> Option<u32> {
    header_str(headers, key)?.parse().ok()
}

/// Helper to parse a possibly fractional number from header value.
fn parse_header_f64(headers: &HeaderMap, key: &str) -> Option<f64> {
    header_str(headers, key)?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
