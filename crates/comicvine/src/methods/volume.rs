//! Volume lookups.

use super::resource_id;
use crate::{RequestHandler, endpoints};
use comicvine_core::{ApiResponse, DataType, Method};
use comicvine_error::ComicVineResult;
use serde_json::Value;

/// Requests against `/volume/4050-{id}/`.
#[derive(Debug, Clone)]
pub struct VolumeMethods {
    handler: RequestHandler,
}

impl VolumeMethods {
    /// Wrap a handler.
    pub fn new(handler: RequestHandler) -> Self {
        Self { handler }
    }

    /// Fetch one volume, id from `data["id"]`.
    pub async fn find(&self, data: Value) -> ComicVineResult<ApiResponse> {
        let id = resource_id(&data)?;
        self.handler
            .request(endpoints::volume(id), Method::Get, DataType::Json, data)
            .await
    }
}
