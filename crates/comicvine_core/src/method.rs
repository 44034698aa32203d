//! HTTP verbs and payload encodings.

use serde::{Deserialize, Serialize};

/// HTTP method of a request.
///
/// # Examples
///
/// ```
/// use comicvine_core::Method;
///
/// let method: Method = "get".parse().unwrap();
/// assert_eq!(method, Method::Get);
/// assert_eq!(method.to_string(), "GET");
/// assert!(method.is_read_only());
/// assert!(!Method::Post.is_read_only());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Whether the method leaves server state untouched.
    ///
    /// Read-only requests send their data as query parameters and are the
    /// only ones eligible for response caching.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

/// How request data is encoded on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Query string for read-only methods, JSON body otherwise
    #[default]
    Json,
    /// `multipart/form-data` with a `file` part and a `payload_json` part
    Multipart,
}
