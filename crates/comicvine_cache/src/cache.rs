//! Response cache implementation.

use crate::RequestSignature;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Longest lifetime an entry can be given.
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Cached response body with its lifetime.
///
/// Entries are read-only once stored; `expires_at` is always
/// `stored_at + ttl`.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    signature: RequestSignature,
    payload: JsonValue,
    stored_at: Instant,
    expires_at: Instant,
}

impl CacheEntry {
    /// Check if this entry is expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }
}

/// Configuration for the response cache.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct CacheConfig {
    /// Default TTL for cached entries (milliseconds)
    #[serde(default = "default_ttl_ms")]
    default_ttl_ms: u64,

    /// Maximum cache size (number of entries)
    #[serde(default = "default_max_size")]
    max_size: usize,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl_ms() -> u64 {
    15 * 60 * 1000
}

fn default_max_size() -> usize {
    1000
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_ttl_ms(),
            max_size: default_max_size(),
            enabled: default_enabled(),
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<RequestSignature, CacheEntry>,
    access_order: VecDeque<RequestSignature>,
}

impl CacheState {
    fn touch(&mut self, signature: &RequestSignature) {
        if let Some(pos) = self.access_order.iter().position(|s| s == signature) {
            self.access_order.remove(pos);
        }
        self.access_order.push_back(signature.clone());
    }

    fn forget(&mut self, signature: &RequestSignature) -> Option<CacheEntry> {
        if let Some(pos) = self.access_order.iter().position(|s| s == signature) {
            self.access_order.remove(pos);
        }
        self.entries.remove(signature)
    }

    fn evict_lru(&mut self) {
        if let Some(signature) = self.access_order.pop_front() {
            tracing::debug!(%signature, "Evicting LRU entry");
            self.entries.remove(&signature);
        }
    }
}

/// Cache for response payloads of read-only requests.
///
/// Safe to share between tasks: every operation takes an internal lock for
/// the duration of a map update, never across an await point. Expired
/// entries are evicted lazily on lookup; [`cleanup_expired`](Self::cleanup_expired)
/// sweeps them eagerly.
///
/// # Example
///
/// ```
/// use comicvine_cache::{CacheConfig, RequestSignature, ResponseCache};
/// use serde_json::json;
/// use std::time::Duration;
///
/// let cache = ResponseCache::new(CacheConfig::default());
/// let signature = RequestSignature::compute("GET", "/search/", &json!({"query": "batman"}));
///
/// cache.put(signature.clone(), json!({"results": []}), None);
///
/// let entry = cache.get(&signature).unwrap();
/// assert_eq!(entry.payload(), &json!({"results": []}));
/// ```
pub struct ResponseCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl ResponseCache {
    /// Create a new response cache with configuration.
    pub fn new(config: CacheConfig) -> Self {
        tracing::debug!(
            default_ttl_ms = config.default_ttl_ms,
            max_size = config.max_size,
            enabled = config.enabled,
            "Creating new ResponseCache"
        );
        Self {
            config,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a response payload.
    ///
    /// `ttl` falls back to the configured default when `None` and is capped at
    /// one year. The payload is
    /// owned by the cache; callers receive clones.
    #[tracing::instrument(skip(self, signature, payload), fields(%signature))]
    pub fn put(&self, signature: RequestSignature, payload: JsonValue, ttl: Option<Duration>) {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return;
        }

        let ttl = ttl
            .unwrap_or(Duration::from_millis(self.config.default_ttl_ms))
            .min(MAX_TTL);
        let stored_at = Instant::now();
        let entry = CacheEntry {
            signature: signature.clone(),
            payload,
            stored_at,
            expires_at: stored_at + ttl,
        };

        let mut state = self.state();
        if state.entries.len() >= self.config.max_size && !state.entries.contains_key(&signature) {
            state.evict_lru();
        }
        state.touch(&signature);
        state.entries.insert(signature, entry);

        tracing::debug!(ttl = ?ttl, cache_size = state.entries.len(), "Inserted entry into cache");
    }

    /// Look up a fresh entry.
    ///
    /// Returns None if:
    /// - Entry doesn't exist
    /// - Entry is expired (it is removed)
    /// - Cache is disabled
    #[tracing::instrument(skip(self, signature), fields(%signature))]
    pub fn get(&self, signature: &RequestSignature) -> Option<CacheEntry> {
        if !self.config.enabled {
            return None;
        }

        let mut state = self.state();
        let entry = state.entries.get(signature)?.clone();
        if entry.is_expired() {
            tracing::debug!("Cache entry expired, removing");
            state.forget(signature);
            return None;
        }

        state.touch(signature);
        tracing::debug!(time_remaining = ?entry.time_remaining(), "Cache hit");
        Some(entry)
    }

    /// Drop one entry, returning it if it was present.
    pub fn invalidate(&self, signature: &RequestSignature) -> Option<CacheEntry> {
        self.state().forget(signature)
    }

    /// Remove expired entries from cache.
    pub fn cleanup_expired(&self) -> usize {
        let mut state = self.state();
        let before = state.entries.len();

        let expired: Vec<RequestSignature> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(signature, _)| signature.clone())
            .collect();
        for signature in &expired {
            state.forget(signature);
        }

        let removed = before - state.entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = state.entries.len(), "Cleaned up expired cache entries");
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        let mut state = self.state();
        let count = state.entries.len();
        state.entries.clear();
        state.access_order.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .finish()
    }
}
