//! Per-call request description.

use crate::{DataType, Endpoint, FilePart, Method};
use serde_json::{Map, Value};
use std::time::Duration;

/// Parameters of a request, as a JSON object.
pub type RequestData = Map<String, Value>;

/// Everything needed to issue one logical request.
///
/// The `format=json` marker is merged into the data on construction, and for
/// multipart requests an embedded file is moved into [`FilePart`].
///
/// # Examples
///
/// ```
/// use comicvine_core::{DataType, Endpoint, Method, RequestDescriptor};
/// use serde_json::json;
///
/// let data = json!({"query": "batman"}).as_object().cloned().unwrap();
/// let descriptor = RequestDescriptor::new(
///     Endpoint::fixed("/search/"),
///     Method::Get,
///     DataType::Json,
///     data,
/// );
///
/// assert_eq!(descriptor.data()["format"], json!("json"));
/// assert_eq!(*descriptor.attempt(), 0);
/// assert!(descriptor.is_cacheable());
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct RequestDescriptor {
    endpoint: Endpoint,
    method: Method,
    data_type: DataType,
    data: RequestData,
    file: Option<FilePart>,
    attempt: u32,
}

impl RequestDescriptor {
    /// Describe a request.
    pub fn new(endpoint: Endpoint, method: Method, data_type: DataType, mut data: RequestData) -> Self {
        let file = match data_type {
            DataType::Multipart => FilePart::extract(&mut data),
            DataType::Json => None,
        };
        data.insert("format".to_string(), Value::String("json".to_string()));
        Self {
            endpoint,
            method,
            data_type,
            data,
            file,
            attempt: 0,
        }
    }

    /// Attach a file part explicitly.
    pub fn with_file(mut self, file: FilePart) -> Self {
        self.file = Some(file);
        self
    }

    /// Record which attempt this descriptor is about to make (0-based).
    pub fn set_attempt(&mut self, attempt: u32) {
        self.attempt = attempt;
    }

    /// Rate-limit bucket for this request.
    pub fn bucket_key(&self) -> &str {
        self.endpoint.bucket_key()
    }

    /// Whether the data travels in the query string.
    pub fn uses_query(&self) -> bool {
        self.data_type == DataType::Json && self.method.is_read_only()
    }

    /// Whether a response to this request may be served from or stored in the cache.
    pub fn is_cacheable(&self) -> bool {
        self.method.is_read_only() && self.file.is_none()
    }
}

/// Per-call knobs that do not change what is sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestOptions {
    /// Skip the cache lookup; the fresh response is still stored
    pub bypass_cache: bool,
    /// Cache lifetime for this response, overriding the configured default
    pub ttl: Option<Duration>,
}

impl RequestOptions {
    /// Options that force a live request and refresh the cached entry.
    pub fn bypass_cache() -> Self {
        Self {
            bypass_cache: true,
            ttl: None,
        }
    }

    /// Options with a custom cache lifetime.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            bypass_cache: false,
            ttl: Some(ttl),
        }
    }
}
