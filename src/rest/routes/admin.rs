//! Blog administration endpoints, guarded by the admin bearer token.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use crate::blog::{BlogPost, BlogPostInput, PostUpdate};
use crate::rest::error::{ApiError, ErrorResponse};
use crate::rest::state::ApiState;

/// List every post, drafts included, newest first
#[utoipa::path(
    get,
    path = "/api/v1/admin/posts",
    tag = "Blog Admin",
    responses(
        (status = 200, description = "All posts", body = Vec<BlogPost>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin API disabled", body = ErrorResponse)
    )
)]
pub async fn list_all(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    state.authorize_admin(&headers)?;
    let store = state.blog.read().await;
    Ok(Json(store.all_posts()))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/v1/admin/posts",
    tag = "Blog Admin",
    request_body = BlogPostInput,
    responses(
        (status = 201, description = "Post created", body = BlogPost),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin API disabled", body = ErrorResponse)
    )
)]
pub async fn create(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(input): Json<BlogPostInput>,
) -> Result<(StatusCode, Json<BlogPost>), ApiError> {
    state.authorize_admin(&headers)?;
    let mut store = state.blog.write().await;
    let post = store.create(input)?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// Update a post; absent fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/v1/admin/posts/{id}",
    tag = "Blog Admin",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    request_body = PostUpdate,
    responses(
        (status = 200, description = "Post updated", body = BlogPost),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Post not found", body = ErrorResponse),
        (status = 409, description = "Slug already in use", body = ErrorResponse)
    )
)]
pub async fn update(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<PostUpdate>,
) -> Result<Json<BlogPost>, ApiError> {
    state.authorize_admin(&headers)?;
    let mut store = state.blog.write().await;
    Ok(Json(store.update(id, update)?))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/v1/admin/posts/{id}",
    tag = "Blog Admin",
    params(
        ("id" = Uuid, Path, description = "Post id")
    ),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found", body = ErrorResponse)
    )
)]
pub async fn delete(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.authorize_admin(&headers)?;
    let mut store = state.blog.write().await;
    store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::PostStatus;
    use crate::config::Config;
    use axum::http::{header, HeaderValue};

    const TOKEN: &str = "admin-t0ken";

    fn admin_state() -> ApiState {
        let mut config = Config::default();
        config.server.admin_token = Some(TOKEN.to_string());
        ApiState::new(config)
    }

    fn auth() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {TOKEN}")).unwrap(),
        );
        headers
    }

    fn input(title: &str) -> BlogPostInput {
        BlogPostInput {
            title: title.to_string(),
            content: "body".to_string(),
            author: "Mira Team".to_string(),
            ..BlogPostInput::default()
        }
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let state = admin_state();

        let (status, Json(post)) = create(State(state.clone()), auth(), Json(input("Draft one")))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(post.status, PostStatus::Draft);

        let Json(updated) = update(
            State(state.clone()),
            auth(),
            Path(post.post_id),
            Json(PostUpdate {
                status: Some(PostStatus::Published),
                ..PostUpdate::default()
            }),
        )
        .await
        .unwrap();
        assert!(updated.is_published());

        let Json(all) = list_all(State(state.clone()), auth()).await.unwrap();
        assert_eq!(all.len(), 1);

        let status = delete(State(state.clone()), auth(), Path(post.post_id))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let result = delete(State(state), auth(), Path(post.post_id)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rejects_without_token() {
        let state = admin_state();
        let result = create(State(state.clone()), HeaderMap::new(), Json(input("Nope"))).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert!(state.blog.read().await.is_empty());

        let disabled = ApiState::new(Config::default());
        let result = list_all(State(disabled), auth()).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_create_invalid_title() {
        let state = admin_state();
        let result = create(State(state), auth(), Json(input("  "))).await;
        assert!(matches!(result, Err(ApiError::ValidationError(_))));
    }
}
