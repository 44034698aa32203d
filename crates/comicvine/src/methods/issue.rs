//! Issue lookups.

use super::resource_id;
use crate::{RequestHandler, endpoints};
use comicvine_core::{ApiResponse, DataType, Method};
use comicvine_error::ComicVineResult;
use serde_json::Value;
use tracing::instrument;

/// Requests against `/issue/4000-{id}/`.
#[derive(Debug, Clone)]
pub struct IssueMethods {
    handler: RequestHandler,
}

impl IssueMethods {
    /// Wrap a handler.
    pub fn new(handler: RequestHandler) -> Self {
        Self { handler }
    }

    /// Fetch one issue; the id is read from `data["id"]` and the whole of
    /// `data` is sent as query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`JsonError`](comicvine_error::JsonError) when `id` is missing
    /// or not a non-negative integer.
    #[instrument(skip(self, data))]
    pub async fn find(&self, data: Value) -> ComicVineResult<ApiResponse> {
        let id = resource_id(&data)?;
        self.handler
            .request(endpoints::issue(id), Method::Get, DataType::Json, data)
            .await
    }
}
