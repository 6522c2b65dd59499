//! Public blog endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::blog::{BlogListResponse, BlogPost};
use crate::rest::dto::ListPostsQuery;
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// List published posts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "Blog",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "One page of published posts", body = BlogListResponse)
    )
)]
pub async fn list(
    State(state): State<ApiState>,
    Query(query): Query<ListPostsQuery>,
) -> Json<BlogListResponse> {
    let store = state.blog.read().await;
    Json(store.list_published(query.page(), query.limit(), query.search.as_deref()))
}

/// Get a published post by slug
#[utoipa::path(
    get,
    path = "/api/v1/posts/{slug}",
    tag = "Blog",
    params(
        ("slug" = String, Path, description = "Post slug")
    ),
    responses(
        (status = 200, description = "Post details", body = BlogPost),
        (status = 404, description = "No published post with this slug", body = ErrorResponse)
    )
)]
pub async fn get_by_slug(
    State(state): State<ApiState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let store = state.blog.read().await;
    store
        .get_published_by_slug(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Post '{}' not found", slug)))
}
