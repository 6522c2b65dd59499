//! Request and response types for the REST API.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default page size for the public post listing
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub waitlist_count: usize,
    pub post_count: usize,
}

/// Query string of `GET /api/v1/posts`
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPostsQuery {
    /// 1-based page number (default 1)
    pub page: Option<usize>,
    /// Page size (default 10, max 100)
    pub limit: Option<usize>,
    /// Case-insensitive match on title or content
    pub search: Option<String>,
}

impl ListPostsQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}
