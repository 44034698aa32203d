//! Request pipeline: cache, limiter, executor and retry policy.

use crate::{ClientConfig, RequestExecutor, RetryPolicy};
use comicvine_cache::{RequestSignature, ResponseCache};
use comicvine_core::{
    ApiResponse, DataType, Endpoint, Method, RequestData, RequestDescriptor, RequestOptions,
};
use comicvine_error::{ComicVineError, ComicVineResult, JsonError};
use comicvine_rate_limit::{BucketTurn, Limiter};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

struct Pipeline {
    config: ClientConfig,
    limiter: Limiter,
    cache: ResponseCache,
    executor: RequestExecutor,
    retry: RetryPolicy,
}

impl Pipeline {
    /// One attempt on the bucket's turn.
    ///
    /// The cache is consulted again here because an identical request queued
    /// ahead of this one may have stored a fresh response in the meantime.
    async fn attempt(
        &self,
        descriptor: &RequestDescriptor,
        turn: &BucketTurn,
        signature: Option<&RequestSignature>,
        options: RequestOptions,
    ) -> ComicVineResult<ApiResponse> {
        if let Some(hit) = self.lookup(signature, options) {
            return Ok(hit);
        }

        let raw = self.executor.execute(descriptor, turn).await?;

        if let Some(signature) = signature {
            self.cache
                .put(signature.clone(), raw.payload.clone(), options.ttl);
        }

        Ok(ApiResponse::live(raw.payload, raw.latency_ms))
    }

    fn lookup(
        &self,
        signature: Option<&RequestSignature>,
        options: RequestOptions,
    ) -> Option<ApiResponse> {
        if options.bypass_cache {
            return None;
        }
        let entry = self.cache.get(signature?)?;
        debug!(cache_hit = true, "Serving response from cache");
        Some(ApiResponse::cached(entry.payload().clone()))
    }
}

/// Entry point for every API call.
///
/// Owns its own limiter buckets and response cache; two handlers never share
/// state. Cloning is cheap and clones share the same pipeline.
///
/// # Example
///
/// ```no_run
/// use comicvine::{ClientConfig, DataType, Method, RequestHandler, endpoints};
/// use serde_json::json;
///
/// # async fn run() -> comicvine::ComicVineResult<()> {
/// let handler = RequestHandler::new(ClientConfig::new("my-api-key"))?;
/// let response = handler
///     .request(
///         endpoints::search(),
///         Method::Get,
///         DataType::Json,
///         json!({"query": "batman", "resources": "issue"}),
///     )
///     .await?;
/// println!("cached: {}", response.from_cache());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestHandler {
    inner: Arc<Pipeline>,
}

impl RequestHandler {
    /// Build a handler from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`](comicvine_error::AuthError) for an empty token and
    /// [`ConfigError`](comicvine_error::ConfigError) for an unusable base URL.
    /// Nothing is sent over the network.
    #[instrument(skip(config), fields(base_host = %config.base_host()))]
    pub fn new(config: ClientConfig) -> ComicVineResult<Self> {
        config.validate()?;

        let executor = RequestExecutor::new(&config)?;
        let limiter = Limiter::new(config.limiter().clone());
        let cache = ResponseCache::new(config.cache().clone());
        let retry = RetryPolicy::new(*config.upstream_backoff_ms());

        debug!("Created request handler");

        Ok(Self {
            inner: Arc::new(Pipeline {
                config,
                limiter,
                cache,
                executor,
                retry,
            }),
        })
    }

    /// Send a request with default options.
    ///
    /// `data` must be a JSON object or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`] for non-object data, otherwise whatever
    /// [`request_with`](Self::request_with) returns.
    pub async fn request(
        &self,
        endpoint: Endpoint,
        method: Method,
        data_type: DataType,
        data: Value,
    ) -> ComicVineResult<ApiResponse> {
        let data = into_request_data(data)?;
        let descriptor = RequestDescriptor::new(endpoint, method, data_type, data);
        self.request_with(descriptor, RequestOptions::default()).await
    }

    /// Send a prepared request.
    ///
    /// Fresh cached responses are returned without touching the limiter.
    /// Otherwise every attempt waits for its bucket's turn, checks the cache
    /// once more, and performs one physical call. Cacheable successes are
    /// stored even when `options.bypass_cache` is set.
    ///
    /// # Errors
    ///
    /// - [`HttpError`](comicvine_error::HttpError) for terminal HTTP and transport failures
    /// - [`RetriesExhaustedError`](comicvine_error::RetriesExhaustedError) when every
    ///   attempt failed with 429 or 502
    /// - [`JsonError`] when a success body is not JSON
    /// - [`RateLimitError`](comicvine_error::RateLimitError) if the bucket worker failed
    #[instrument(
        skip(self, descriptor, options),
        fields(
            endpoint = %descriptor.endpoint(),
            method = %descriptor.method(),
            bucket = descriptor.bucket_key(),
        )
    )]
    pub async fn request_with(
        &self,
        mut descriptor: RequestDescriptor,
        options: RequestOptions,
    ) -> ComicVineResult<ApiResponse> {
        let signature = descriptor.is_cacheable().then(|| {
            RequestSignature::compute(
                descriptor.method().as_ref(),
                descriptor.endpoint().path(),
                &Value::Object(descriptor.data().clone()),
            )
        });

        if let Some(hit) = self.inner.lookup(signature.as_ref(), options) {
            return Ok(hit);
        }

        let key = descriptor.bucket_key().to_string();
        let pipeline = self.inner.clone();

        let response = self
            .inner
            .retry
            .run(&mut descriptor, |attempt| {
                let worker = pipeline.clone();
                let signature = signature.clone();
                let pipeline = pipeline.clone();
                let key = key.clone();
                async move {
                    pipeline
                        .limiter
                        .enqueue(&key, move |turn| async move {
                            worker
                                .attempt(&attempt, &turn, signature.as_ref(), options)
                                .await
                        })
                        .await
                        .unwrap_or_else(|e| Err(ComicVineError::from(e)))
                }
            })
            .await?;

        debug!(
            from_cache = response.from_cache(),
            latency_ms = response.latency_ms(),
            attempts = *descriptor.attempt() + 1,
            "Request completed"
        );
        Ok(response)
    }

    /// Configuration the handler was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Bucket state of this handler.
    pub fn limiter(&self) -> &Limiter {
        &self.inner.limiter
    }

    /// Response cache of this handler.
    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    /// Latency of the most recent physical call (milliseconds).
    pub fn last_latency_ms(&self) -> u64 {
        self.inner.executor.last_latency_ms()
    }
}

impl std::fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHandler")
            .field("config", &self.inner.config)
            .field("limiter", &self.inner.limiter)
            .field("cached_entries", &self.inner.cache.len())
            .finish()
    }
}

fn into_request_data(data: Value) -> ComicVineResult<RequestData> {
    match data {
        Value::Null => Ok(RequestData::new()),
        Value::Object(map) => Ok(map),
        other => Err(JsonError::new(format!(
            "Request data must be a JSON object, got {}",
            other
        ))
        .into()),
    }
}
