//! Per-resource rate-limit state.

use crate::{MAX_WAIT, RateLimitHeaders};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Allowance and reset time for one rate-limited resource.
///
/// A bucket is only ever mutated by the operation currently holding its
/// turn, so header updates are last-write-wins without merging.
#[derive(Debug, Clone)]
pub struct Bucket {
    key: String,
    remaining: u32,
    limit: u32,
    reset_at: Option<Instant>,
    reset_floor: Option<Duration>,
}

/// Point-in-time view of a bucket, for observability and tests.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct BucketSnapshot {
    key: String,
    remaining: u32,
    limit: u32,
    reset_in: Option<Duration>,
}

impl Bucket {
    /// Create a bucket with an optimistic allowance of one call.
    ///
    /// `reset_floor` is the minimum reset delay applied to specially limited
    /// endpoints.
    pub fn new(key: impl Into<String>, reset_floor: Option<Duration>) -> Self {
        Self {
            key: key.into(),
            remaining: 1,
            limit: 1,
            reset_at: None,
            reset_floor,
        }
    }

    /// Bucket key (endpoint template).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Calls left in the current window.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Calls allowed per window, as last reported.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Instant the window resets, if known.
    pub fn reset_at(&self) -> Option<Instant> {
        self.reset_at
    }

    /// When the next operation may run, or `None` if it may run now.
    ///
    /// An exhausted bucket whose reset time has passed is refilled to its
    /// limit, so it cannot lock out callers after the window ends.
    pub fn ready_at(&mut self, now: Instant) -> Option<Instant> {
        if self.remaining > 0 {
            return None;
        }
        match self.reset_at {
            Some(reset_at) if reset_at > now => Some(reset_at),
            _ => {
                self.remaining = self.limit.max(1);
                self.reset_at = None;
                None
            }
        }
    }

    /// Apply hints from a response.
    ///
    /// `local_now_ms` is the wall clock matching `now`, needed to translate the
    /// server's epoch reset time into a local instant.
    pub fn apply(&mut self, hints: &RateLimitHeaders, now: Instant, local_now_ms: i64) {
        if let Some(delay) = hints.reset_delay(local_now_ms) {
            let delay = match self.reset_floor {
                Some(floor) => delay.max(floor),
                None => delay,
            }
            .min(MAX_WAIT);
            self.reset_at = Some(now.checked_add(delay).unwrap_or(now + MAX_WAIT));
        }

        // A missing header must not lock the bucket out.
        self.remaining = hints.remaining.unwrap_or(1);

        if let Some(limit) = hints.limit {
            self.limit = limit;
        }

        debug!(
            bucket = %self.key,
            remaining = self.remaining,
            limit = self.limit,
            reset_in_ms = ?self.reset_at.map(|at| at.saturating_duration_since(now).as_millis()),
            "Updated bucket from response headers"
        );
    }

    /// Snapshot relative to `now`.
    pub fn snapshot(&self, now: Instant) -> BucketSnapshot {
        BucketSnapshot {
            key: self.key.clone(),
            remaining: self.remaining,
            limit: self.limit,
            reset_in: self.reset_at.map(|at| at.saturating_duration_since(now)),
        }
    }
}
