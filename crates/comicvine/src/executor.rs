//! Physical HTTP execution of one attempt.

use crate::ClientConfig;
use comicvine_core::{DataType, Method, RequestData, RequestDescriptor};
use comicvine_error::{ComicVineResult, ConfigError, HttpError, HttpErrorKind, JsonError};
use comicvine_rate_limit::BucketTurn;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Body and headers of a successful physical call.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Parsed JSON body, `Null` when the body was empty
    pub payload: Value,
    /// Response headers as received
    pub headers: HeaderMap,
    /// Time from dispatch to response headers (milliseconds)
    pub latency_ms: u64,
}

/// Sends requests to the upstream and classifies the outcome.
///
/// Every request carries the API key twice, as the `api_key` query parameter
/// and as the `Authorization` header. Rate-limit headers of every response,
/// success or failure, are applied to the bucket of the current turn before
/// the status is inspected.
pub struct RequestExecutor {
    client: reqwest::Client,
    base_url: String,
    token: String,
    last_latency_ms: AtomicU64,
}

impl RequestExecutor {
    /// Build the HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> ComicVineResult<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.request_timeout_secs()))
            .user_agent(config.user_agent().as_str())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        debug!(base_url = %base_url, "Creating RequestExecutor");

        Ok(Self {
            client,
            base_url,
            token: config.token().clone(),
            last_latency_ms: AtomicU64::new(0),
        })
    }

    /// Latency of the most recent physical call (milliseconds).
    pub fn last_latency_ms(&self) -> u64 {
        self.last_latency_ms.load(Ordering::Relaxed)
    }

    /// Perform one physical call on the given bucket turn.
    ///
    /// # Errors
    ///
    /// - [`HttpError`] with the classified status for non-2xx responses
    /// - [`HttpError`] with [`HttpErrorKind::Transport`] when the request
    ///   could not be sent or the body could not be read
    /// - [`JsonError`] when a 2xx body is not valid JSON
    #[instrument(
        skip(self, descriptor, turn),
        fields(
            endpoint = %descriptor.endpoint(),
            method = %descriptor.method(),
            attempt = descriptor.attempt(),
        )
    )]
    pub async fn execute(
        &self,
        descriptor: &RequestDescriptor,
        turn: &BucketTurn,
    ) -> ComicVineResult<RawResponse> {
        let url = format!("{}{}", self.base_url, descriptor.endpoint().path());
        let request = self.build_request(descriptor, &url)?;

        turn.pace().await;

        let started = Instant::now();
        let sent = request.send().await;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_latency_ms.store(latency_ms, Ordering::Relaxed);

        let response = sent.map_err(|e| {
            warn!(error = %e, "Request failed to send");
            http_error(descriptor, HttpErrorKind::Transport(e.to_string()))
        })?;

        turn.apply_headers(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| http_error(descriptor, HttpErrorKind::Transport(e.to_string())))?;

        debug!(status = status.as_u16(), latency_ms, "Received response");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(http_error(
                descriptor,
                HttpErrorKind::from_status(status.as_u16(), body),
            )
            .into());
        }

        let payload = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)
                .map_err(|e| JsonError::invalid_response(descriptor.endpoint(), e))?
        };

        Ok(RawResponse {
            payload,
            headers,
            latency_ms,
        })
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        url: &str,
    ) -> ComicVineResult<reqwest::RequestBuilder> {
        let request = self
            .client
            .request(to_reqwest_method(*descriptor.method()), url)
            .query(&[("api_key", self.token.as_str())])
            .header(AUTHORIZATION, self.token.as_str());

        if descriptor.uses_query() {
            return Ok(request.query(&query_pairs(descriptor.data())));
        }

        match descriptor.data_type() {
            DataType::Json => Ok(request.json(descriptor.data())),
            DataType::Multipart => {
                let payload_json = serde_json::to_string(descriptor.data()).map_err(|e| {
                    JsonError::new(format!("Failed to serialize multipart payload: {}", e))
                })?;
                let mut form = Form::new().text("payload_json", payload_json);
                if let Some(file) = descriptor.file() {
                    let mut part = Part::bytes(file.bytes().clone());
                    if let Some(name) = file.name() {
                        part = part.file_name(name.clone());
                    }
                    form = form.part("file", part);
                }
                Ok(request.multipart(form))
            }
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.base_url)
            .field("last_latency_ms", &self.last_latency_ms())
            .finish()
    }
}

#[track_caller]
fn http_error(descriptor: &RequestDescriptor, kind: HttpErrorKind) -> HttpError {
    HttpError::new(
        kind,
        descriptor.endpoint().path().as_str(),
        descriptor.method().to_string(),
    )
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Query parameters for a read-only request.
///
/// Strings are sent as-is, other scalars in their JSON form, arrays and
/// objects JSON-encoded. Nulls are omitted.
fn query_pairs(data: &RequestData) -> Vec<(String, String)> {
    data.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_stringify_values() {
        let data = json!({
            "query": "batman",
            "limit": 10,
            "field_list": ["id", "name"],
            "resources": null,
        });
        let mut pairs = query_pairs(data.as_object().unwrap());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("field_list".to_string(), "[\"id\",\"name\"]".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("query".to_string(), "batman".to_string()),
            ]
        );
    }

    #[test]
    fn test_executor_rejects_bad_base_url() {
        let config = ClientConfig::new("key").with_base_host("not a url");
        assert!(RequestExecutor::new(&config).is_err());
    }
}
