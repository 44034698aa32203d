//! Stable request signatures used as cache keys.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 digest of method, path and canonical parameters.
///
/// Parameters are serialized with object keys in sorted order, so two maps
/// with the same entries always produce the same signature, while different
/// filters or pagination produce different ones.
///
/// # Example
///
/// ```
/// use comicvine_cache::RequestSignature;
/// use serde_json::json;
///
/// let a = RequestSignature::compute("GET", "/search/", &json!({"query": "batman", "page": 1}));
/// let b = RequestSignature::compute("GET", "/search/", &json!({"page": 1, "query": "batman"}));
/// let c = RequestSignature::compute("GET", "/search/", &json!({"query": "batman", "page": 2}));
///
/// assert_eq!(a, b);
/// assert_ne!(a, c);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestSignature(String);

impl RequestSignature {
    /// Compute the signature of a request.
    pub fn compute(method: &str, path: &str, params: &Value) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(method.to_ascii_uppercase().as_bytes());
        hasher.update(b"\n");
        hasher.update(path.as_bytes());
        hasher.update(b"\n");
        hasher.update(canonical(params).as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serialize with object keys sorted at every depth.
fn canonical(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|key| format!("{}:{}", Value::String(key.clone()), canonical(&map[key])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_and_path_are_part_of_signature() {
        let params = json!({"format": "json"});
        let get = RequestSignature::compute("GET", "/search/", &params);
        assert_eq!(get, RequestSignature::compute("get", "/search/", &params));
        assert_ne!(get, RequestSignature::compute("HEAD", "/search/", &params));
        assert_ne!(get, RequestSignature::compute("GET", "/issues/", &params));
    }

    #[test]
    fn test_nested_keys_are_canonical() {
        let a = RequestSignature::compute("GET", "/x/", &json!({"f": {"b": 1, "a": [1, 2]}}));
        let b = RequestSignature::compute("GET", "/x/", &json!({"f": {"a": [1, 2], "b": 1}}));
        let c = RequestSignature::compute("GET", "/x/", &json!({"f": {"a": [2, 1], "b": 1}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_signature_is_hex_sha256() {
        let sig = RequestSignature::compute("GET", "/search/", &json!({}));
        assert_eq!(sig.as_str().len(), 64);
        assert!(sig.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
