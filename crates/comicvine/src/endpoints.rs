//! Upstream location and endpoint builders.
//!
//! Endpoints carry both the template (the bucket key) and the resolved path,
//! so every issue lookup shares one bucket regardless of the id requested.

use comicvine_core::Endpoint;

/// Default upstream host.
pub const BASE_HOST: &str = "https://comicvine.gamespot.com";

/// Path prefix shared by every endpoint.
pub const BASE_PATH: &str = "/api";

/// Full-text search across resource types.
pub fn search() -> Endpoint {
    Endpoint::fixed("/search/")
}

/// A single issue by numeric id.
///
/// ```
/// let endpoint = comicvine::endpoints::issue(6);
/// assert_eq!(endpoint.path(), "/issue/4000-6/");
/// assert_eq!(endpoint.bucket_key(), "/issue/4000-:id/");
/// ```
pub fn issue(id: u64) -> Endpoint {
    Endpoint::new("/issue/4000-:id/", format!("/issue/4000-{}/", id))
}

/// A single volume by numeric id.
pub fn volume(id: u64) -> Endpoint {
    Endpoint::new("/volume/4050-:id/", format!("/volume/4050-{}/", id))
}
