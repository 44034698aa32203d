//! High-level client.

use crate::methods::{IssueMethods, SearchMethods, VolumeMethods};
use crate::{ClientConfig, RequestHandler};
use comicvine_error::ComicVineResult;

/// ComicVine API client.
///
/// Groups the resource helpers over one [`RequestHandler`], so they share
/// bucket state and cache.
///
/// # Example
///
/// ```no_run
/// use comicvine::ComicVine;
/// use serde_json::json;
///
/// # async fn run() -> comicvine::ComicVineResult<()> {
/// let client = ComicVine::new("my-api-key")?;
/// let issue = client.issue().find(json!({"id": 6})).await?;
/// println!("{}", issue.payload());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ComicVine {
    handler: RequestHandler,
    search: SearchMethods,
    issue: IssueMethods,
    volume: VolumeMethods,
}

impl ComicVine {
    /// Client with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`](comicvine_error::AuthError) for an empty token.
    pub fn new(token: impl Into<String>) -> ComicVineResult<Self> {
        Self::with_config(ClientConfig::new(token))
    }

    /// Client with explicit configuration.
    pub fn with_config(config: ClientConfig) -> ComicVineResult<Self> {
        let handler = RequestHandler::new(config)?;
        Ok(Self {
            search: SearchMethods::new(handler.clone()),
            issue: IssueMethods::new(handler.clone()),
            volume: VolumeMethods::new(handler.clone()),
            handler,
        })
    }

    /// Search helpers.
    pub fn search(&self) -> &SearchMethods {
        &self.search
    }

    /// Issue helpers.
    pub fn issue(&self) -> &IssueMethods {
        &self.issue
    }

    /// Volume helpers.
    pub fn volume(&self) -> &VolumeMethods {
        &self.volume
    }

    /// The underlying request handler.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }
}
