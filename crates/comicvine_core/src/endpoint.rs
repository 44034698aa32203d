//! Endpoint identity.

use serde::{Deserialize, Serialize};

/// A resolved API path together with the template it was built from.
///
/// Rate-limit buckets are keyed by the template, so every instantiation of a
/// parameterized route (for example "issue by id") shares one bucket.
///
/// # Examples
///
/// ```
/// use comicvine_core::Endpoint;
///
/// let a = Endpoint::new("/issue/4000-:id/", "/issue/4000-1/");
/// let b = Endpoint::new("/issue/4000-:id/", "/issue/4000-2/");
/// assert_eq!(a.bucket_key(), b.bucket_key());
/// assert_ne!(a.path(), b.path());
///
/// let search = Endpoint::fixed("/search/");
/// assert_eq!(search.bucket_key(), "/search/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct Endpoint {
    /// Route template, e.g. `/volume/4050-:id/`
    template: String,
    /// Path sent on the wire, e.g. `/volume/4050-112031/`
    path: String,
}

impl Endpoint {
    /// Create an endpoint from a template and its resolved path.
    pub fn new(template: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            path: path.into(),
        }
    }

    /// Create an endpoint whose path has no parameters.
    pub fn fixed(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            template: path.clone(),
            path,
        }
    }

    /// Rate-limit bucket this endpoint belongs to.
    pub fn bucket_key(&self) -> &str {
        &self.template
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
