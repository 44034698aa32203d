//! Typed result of a successful request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed JSON payload plus how it was obtained.
///
/// # Examples
///
/// ```
/// use comicvine_core::ApiResponse;
/// use serde_json::json;
///
/// let live = ApiResponse::live(json!({"results": []}), 120);
/// assert!(!live.from_cache());
///
/// let cached = ApiResponse::cached(live.payload().clone());
/// assert!(cached.from_cache());
/// assert_eq!(cached.payload(), live.payload());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    payload: Value,
    from_cache: bool,
    latency_ms: u64,
}

impl ApiResponse {
    /// Response obtained from a physical network call.
    pub fn live(payload: Value, latency_ms: u64) -> Self {
        Self {
            payload,
            from_cache: false,
            latency_ms,
        }
    }

    /// Response served from the cache.
    pub fn cached(payload: Value) -> Self {
        Self {
            payload,
            from_cache: true,
            latency_ms: 0,
        }
    }

    /// The parsed JSON body.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume the response, keeping only the payload.
    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// Whether the payload came from the cache.
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Round-trip time of the physical call, zero for cached responses.
    pub fn latency_ms(&self) -> u64 {
        self.latency_ms
    }
}
