//! Per-bucket request queues.
//!
//! Each bucket key gets one unbounded channel drained by one worker task, so
//! operations on a key run strictly one at a time and in enqueue order, while
//! operations on different keys proceed concurrently. Before each operation
//! the worker waits out the global halt and, if the bucket is exhausted, its
//! reset time. Waiting suspends only that worker.

use crate::{Bucket, BucketSnapshot, GlobalHalt, LimiterConfig, MAX_WAIT, RateLimitHeaders};
use comicvine_error::{RateLimitError, RateLimitErrorKind};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovernorRateLimiter};
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

type Job = Box<dyn FnOnce(BucketTurn) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access to a bucket for the duration of one operation.
///
/// Handed to every enqueued operation. The operation reports the server's
/// rate-limit headers through it before returning.
#[derive(Clone)]
pub struct BucketTurn {
    bucket: Arc<Mutex<Bucket>>,
    global: Arc<GlobalHalt>,
    pacer: Option<Arc<DefaultDirectRateLimiter>>,
    default_global_retry_after: Duration,
}

impl BucketTurn {
    /// Key of the bucket this turn belongs to.
    pub fn key(&self) -> String {
        lock(&self.bucket).key().to_string()
    }

    /// Wait for the client-side pacer, if one is configured.
    ///
    /// Call right before the physical request goes out.
    pub async fn pace(&self) {
        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }
    }

    /// Apply rate-limit headers from a response (success or failure).
    pub fn apply_headers(&self, headers: &HeaderMap) {
        self.apply(&RateLimitHeaders::from_headers(headers));
    }

    /// Apply already parsed rate-limit hints.
    pub fn apply(&self, hints: &RateLimitHeaders) {
        let now = Instant::now();
        let local_now_ms = chrono::Utc::now().timestamp_millis();

        if hints.global {
            let retry_after = hints
                .retry_after
                .unwrap_or(self.default_global_retry_after)
                .min(MAX_WAIT);
            self.global
                .halt_until(now.checked_add(retry_after).unwrap_or(now + MAX_WAIT));
        }

        lock(&self.bucket).apply(hints, now, local_now_ms);
    }
}

struct BucketQueue {
    jobs: mpsc::UnboundedSender<Job>,
    bucket: Arc<Mutex<Bucket>>,
}

/// Serializes operations per bucket key.
///
/// Owns all bucket state; two limiters never share buckets.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = Limiter::new(LimiterConfig::default());
/// let value = limiter.enqueue("/search/", |_turn| async { 42 }).await?;
/// assert_eq!(value, 42);
/// ```
pub struct Limiter {
    config: LimiterConfig,
    queues: Mutex<HashMap<String, BucketQueue>>,
    global: Arc<GlobalHalt>,
    pacer: Option<Arc<DefaultDirectRateLimiter>>,
}

impl Limiter {
    /// Create a limiter with no buckets.
    pub fn new(config: LimiterConfig) -> Self {
        let pacer = config
            .max_requests_per_second()
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(GovernorRateLimiter::direct(Quota::per_second(rps))));

        debug!(
            max_requests_per_second = ?config.max_requests_per_second(),
            "Creating new Limiter"
        );

        Self {
            config,
            queues: Mutex::new(HashMap::new()),
            global: Arc::new(GlobalHalt::new()),
            pacer,
        }
    }

    /// Run `operation` on the turn of bucket `key`.
    ///
    /// Operations sharing a key run one at a time in enqueue order. The
    /// operation starts once the global halt has cleared and the bucket has
    /// allowance left (or its reset time has passed). No timeout is applied;
    /// wrap the call in `tokio::time::timeout` if the upstream may never reset.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket worker died or the operation was dropped
    /// before completing (for example because it panicked).
    #[instrument(skip(self, operation))]
    pub async fn enqueue<F, Fut, T>(&self, key: &str, operation: F) -> Result<T, RateLimitError>
    where
        F: FnOnce(BucketTurn) -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |turn| {
            Box::pin(async move {
                let output = operation(turn).await;
                // The caller may have stopped waiting; nothing to do then.
                let _ = tx.send(output);
            })
        });

        self.queue_for(key)
            .send(job)
            .map_err(|_| RateLimitError::new(RateLimitErrorKind::QueueClosed(key.to_string())))?;

        rx.await
            .map_err(|_| RateLimitError::new(RateLimitErrorKind::OperationDropped(key.to_string())))
    }

    /// Current state of a bucket, if it has been created.
    pub fn bucket_snapshot(&self, key: &str) -> Option<BucketSnapshot> {
        let queues = lock(&self.queues);
        let queue = queues.get(key)?;
        let snapshot = lock(&queue.bucket).snapshot(Instant::now());
        Some(snapshot)
    }

    /// Number of buckets created so far.
    pub fn bucket_count(&self) -> usize {
        lock(&self.queues).len()
    }

    /// Whether the server-signalled global halt is in force.
    pub fn is_globally_halted(&self) -> bool {
        self.global.is_halted()
    }

    /// Sender for the bucket's queue, creating the bucket and its worker on
    /// first use (or after the previous worker died).
    fn queue_for(&self, key: &str) -> mpsc::UnboundedSender<Job> {
        let mut queues = lock(&self.queues);

        if let Some(queue) = queues.get(key)
            && !queue.jobs.is_closed()
        {
            return queue.jobs.clone();
        }

        let bucket = match queues.remove(key) {
            Some(dead) => dead.bucket,
            None => Arc::new(Mutex::new(Bucket::new(key, self.config.reset_floor_for(key)))),
        };

        debug!(bucket = key, "Starting bucket worker");
        let (jobs, rx) = mpsc::unbounded_channel();
        let turn = BucketTurn {
            bucket: bucket.clone(),
            global: self.global.clone(),
            pacer: self.pacer.clone(),
            default_global_retry_after: Duration::from_millis(
                *self.config.default_global_retry_after_ms(),
            ),
        };
        tokio::spawn(run_bucket(rx, turn));

        queues.insert(
            key.to_string(),
            BucketQueue {
                jobs: jobs.clone(),
                bucket,
            },
        );
        jobs
    }
}

impl std::fmt::Debug for Limiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Limiter")
            .field("config", &self.config)
            .field("buckets", &self.bucket_count())
            .field("global", &self.global)
            .finish()
    }
}

/// Drain one bucket's queue until every sender is gone.
async fn run_bucket(mut jobs: mpsc::UnboundedReceiver<Job>, turn: BucketTurn) {
    while let Some(job) = jobs.recv().await {
        wait_for_turn(&turn).await;
        job(turn.clone()).await;
    }
    trace!("Bucket worker exiting");
}

async fn wait_for_turn(turn: &BucketTurn) {
    loop {
        let now = Instant::now();

        if let Some(until) = turn.global.ready_at(now) {
            debug!(
                wait_ms = until.saturating_duration_since(now).as_millis(),
                "Waiting for global halt to clear"
            );
            tokio::time::sleep_until(until).await;
            continue;
        }

        let ready_at = lock(&turn.bucket).ready_at(now);
        match ready_at {
            Some(until) => {
                debug!(
                    bucket = %turn.key(),
                    wait_ms = until.saturating_duration_since(now).as_millis(),
                    "Bucket exhausted, waiting for reset"
                );
                tokio::time::sleep_until(until).await;
            }
            None => return,
        }
    }
}
