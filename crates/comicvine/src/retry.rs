//! Bounded resubmission of retryable failures.

use comicvine_core::RequestDescriptor;
use comicvine_error::{ComicVineResult, HttpErrorKind, RetriesExhaustedError};
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

/// Physical attempts allowed per logical request.
pub const MAX_ATTEMPTS: u32 = 3;

/// Upper bound for one 502 backoff delay.
const MAX_UPSTREAM_BACKOFF: Duration = Duration::from_secs(5);

/// Resubmits requests that failed with 429 or 502.
///
/// A 429 is resubmitted right away: the failed attempt already applied the
/// server's reset hints to the bucket, so the limiter holds the next attempt
/// until the bucket or global halt clears. A 502 carries no such hints, so
/// the policy sleeps an exponential delay with jitter first.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    upstream_backoff_ms: u64,
}

impl RetryPolicy {
    /// Policy with the given base delay for 502 resubmission; 0 disables the delay.
    pub fn new(upstream_backoff_ms: u64) -> Self {
        Self {
            upstream_backoff_ms,
        }
    }

    /// Delays applied before successive 502 resubmissions.
    fn upstream_backoff(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        if self.upstream_backoff_ms == 0 {
            return Box::new(std::iter::repeat(Duration::ZERO));
        }
        // 2^n * factor: base, 2 * base, 4 * base, ...
        Box::new(
            ExponentialBackoff::from_millis(2)
                .factor((self.upstream_backoff_ms / 2).max(1))
                .max_delay(MAX_UPSTREAM_BACKOFF)
                .map(jitter),
        )
    }

    /// Run `attempt` until it succeeds, fails terminally, or the budget is spent.
    ///
    /// The descriptor's attempt counter is updated before each call so the
    /// closure sees which attempt it is making.
    ///
    /// # Errors
    ///
    /// Non-retryable errors are returned unchanged. After [`MAX_ATTEMPTS`]
    /// retryable failures a [`RetriesExhaustedError`] wrapping the last
    /// failure is returned.
    pub async fn run<F, Fut, T>(
        &self,
        descriptor: &mut RequestDescriptor,
        mut attempt: F,
    ) -> ComicVineResult<T>
    where
        F: FnMut(RequestDescriptor) -> Fut,
        Fut: Future<Output = ComicVineResult<T>>,
    {
        let mut backoff = self.upstream_backoff();
        let mut made = 0;

        loop {
            descriptor.set_attempt(made);
            made += 1;

            let err = match attempt(descriptor.clone()).await {
                Ok(value) => {
                    if made > 1 {
                        debug!(attempts = made, "Request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let Some(failure) = err.as_retryable().cloned() else {
                return Err(err);
            };

            if made >= MAX_ATTEMPTS {
                warn!(
                    endpoint = %failure.endpoint,
                    attempts = made,
                    error = %failure.kind,
                    "Retry budget exhausted"
                );
                return Err(RetriesExhaustedError::new(made, failure).into());
            }

            warn!(
                endpoint = %failure.endpoint,
                attempt = made,
                max_attempts = MAX_ATTEMPTS,
                error = %failure.kind,
                "Retryable failure, resubmitting"
            );

            if matches!(failure.kind, HttpErrorKind::UpstreamUnavailable { .. })
                && let Some(delay) = backoff.next()
                && !delay.is_zero()
            {
                debug!(delay_ms = delay.as_millis(), "Backing off before resubmitting");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(250)
    }
}
