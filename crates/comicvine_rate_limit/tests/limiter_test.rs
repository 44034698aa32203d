//! Tests for per-bucket serialization and header-driven waiting.

use comicvine_rate_limit::{Limiter, LimiterConfig, MAX_WAIT, RateLimitHeaders};
use futures::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Barrier;

fn exhausted_until(reset_in: Duration) -> HeaderMap {
    let reset = chrono::Utc::now().timestamp_millis() as f64 / 1000.0 + reset_in.as_secs_f64();
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("x-ratelimit-limit", HeaderValue::from_static("5"));
    headers.insert(
        "x-ratelimit-reset",
        HeaderValue::from_str(&format!("{:.3}", reset)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn test_same_bucket_runs_in_enqueue_order() {
    let limiter = Limiter::new(LimiterConfig::default());
    let order = Arc::new(Mutex::new(Vec::new()));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let calls = (0..8).map(|i| {
        let order = order.clone();
        let in_flight = in_flight.clone();
        let max_in_flight = max_in_flight.clone();
        limiter.enqueue("/issue/4000-:id/", move |_turn| async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);
            // Later calls finish faster, so any overlap would reorder them.
            tokio::time::sleep(Duration::from_millis(20 - i * 2)).await;
            order.lock().unwrap().push(i);
            in_flight.fetch_sub(1, Ordering::SeqCst);
            i
        })
    });

    let results = join_all(calls).await;
    let results: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();

    assert_eq!(results, (0..8).collect::<Vec<_>>());
    assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_distinct_buckets_run_concurrently() {
    let limiter = Limiter::new(LimiterConfig::default());
    let barrier = Arc::new(Barrier::new(2));

    let a = {
        let barrier = barrier.clone();
        limiter.enqueue("/search/", move |_turn| async move {
            barrier.wait().await;
        })
    };
    let b = {
        let barrier = barrier.clone();
        limiter.enqueue("/volume/4050-:id/", move |_turn| async move {
            barrier.wait().await;
        })
    };

    // Serialized buckets would deadlock on the barrier.
    let joined = tokio::time::timeout(Duration::from_secs(2), futures::future::join(a, b)).await;
    let (a, b) = joined.expect("buckets should not block each other");
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(limiter.bucket_count(), 2);
}

#[tokio::test]
async fn test_exhausted_bucket_delays_next_call_until_reset() {
    let limiter = Limiter::new(LimiterConfig::default());
    let headers = exhausted_until(Duration::from_millis(600));

    limiter
        .enqueue("/search/", move |turn| async move {
            turn.apply_headers(&headers);
        })
        .await
        .unwrap();

    let snapshot = limiter.bucket_snapshot("/search/").unwrap();
    assert_eq!(*snapshot.remaining(), 0);
    assert_eq!(*snapshot.limit(), 5);

    let started = Instant::now();
    limiter
        .enqueue("/search/", |_turn| async {})
        .await
        .unwrap();
    assert!(
        started.elapsed() >= Duration::from_millis(450),
        "second call fired after {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_exhausted_bucket_does_not_delay_other_buckets() {
    let limiter = Limiter::new(LimiterConfig::default());
    let headers = exhausted_until(Duration::from_secs(5));

    limiter
        .enqueue("/search/", move |turn| async move {
            turn.apply_headers(&headers);
        })
        .await
        .unwrap();

    let started = Instant::now();
    limiter
        .enqueue("/issue/4000-:id/", |_turn| async {})
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_missing_remaining_header_keeps_bucket_open() {
    let limiter = Limiter::new(LimiterConfig::default());

    limiter
        .enqueue("/search/", |turn| async move {
            turn.apply_headers(&HeaderMap::new());
        })
        .await
        .unwrap();

    let snapshot = limiter.bucket_snapshot("/search/").unwrap();
    assert_eq!(*snapshot.remaining(), 1);
}

#[tokio::test]
async fn test_global_halt_stops_every_bucket() {
    let limiter = Limiter::new(LimiterConfig::default());

    limiter
        .enqueue("/search/", |turn| async move {
            turn.apply(&RateLimitHeaders {
                global: true,
                retry_after: Some(Duration::from_millis(400)),
                ..Default::default()
            });
        })
        .await
        .unwrap();
    assert!(limiter.is_globally_halted());

    let started = Instant::now();
    limiter
        .enqueue("/volume/4050-:id/", |_turn| async {})
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(300));
    assert!(!limiter.is_globally_halted());
}

#[tokio::test]
async fn test_out_of_range_headers_do_not_drop_result() {
    let limiter = Limiter::new(LimiterConfig::default());
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("1e300"));
    headers.insert("x-ratelimit-global", HeaderValue::from_static("true"));
    headers.insert("retry-after", HeaderValue::from_static("1e300"));

    let value = limiter
        .enqueue("/search/", move |turn| async move {
            turn.apply_headers(&headers);
            "payload"
        })
        .await
        .unwrap();

    assert_eq!(value, "payload");
    assert!(limiter.is_globally_halted());
    let snapshot = limiter.bucket_snapshot("/search/").unwrap();
    assert!(snapshot.reset_in().is_some_and(|reset_in| reset_in <= MAX_WAIT));
}

#[tokio::test]
async fn test_panicking_operation_does_not_poison_bucket() {
    let limiter = Limiter::new(LimiterConfig::default());

    let result = limiter
        .enqueue("/search/", |_turn| async {
            panic!("operation failed hard");
        })
        .await;
    assert!(result.is_err());

    let value = limiter.enqueue("/search/", |_turn| async { 7 }).await.unwrap();
    assert_eq!(value, 7);
}

#[tokio::test]
async fn test_pacing_spaces_out_calls() {
    let config = LimiterConfig::default().with_max_requests_per_second(Some(2));
    let limiter = Limiter::new(config);

    let started = Instant::now();
    for key in ["/search/", "/issue/4000-:id/", "/volume/4050-:id/"] {
        limiter
            .enqueue(key, |turn| async move { turn.pace().await })
            .await
            .unwrap();
    }
    // Two per second: the third call waits for the quota to replenish.
    assert!(started.elapsed() >= Duration::from_millis(400));
}
