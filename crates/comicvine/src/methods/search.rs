//! Search endpoint.

use crate::{RequestHandler, endpoints};
use comicvine_core::{ApiResponse, DataType, Method};
use comicvine_error::ComicVineResult;
use serde_json::Value;
use tracing::instrument;

/// Full-text search.
#[derive(Debug, Clone)]
pub struct SearchMethods {
    handler: RequestHandler,
}

impl SearchMethods {
    /// Wrap a handler.
    pub fn new(handler: RequestHandler) -> Self {
        Self { handler }
    }

    /// Search for comics.
    ///
    /// `data` is sent as query parameters, typically `query` plus optional
    /// `resources`, `limit`, `page` and `field_list`.
    #[instrument(skip(self, data))]
    pub async fn search_comic(&self, data: Value) -> ComicVineResult<ApiResponse> {
        self.handler
            .request(endpoints::search(), Method::Get, DataType::Json, data)
            .await
    }
}
