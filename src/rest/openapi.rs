//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::blog::{BlogListResponse, BlogPost, BlogPostInput, PostStatus, PostUpdate};
use crate::lead::LeadRecord;
use crate::rest::dto::{HealthResponse, StatusResponse};
use crate::rest::error::ErrorResponse;
use crate::services::SubmissionResult;

/// OpenAPI documentation for the Mira waitlist API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mira Waitlist API",
        description = "Waitlist registration and blog endpoints for the Mira landing site. \
                       Admin routes require `Authorization: Bearer <server.admin_token>`.",
        license(name = "MIT")
    ),
    paths(
        // Health endpoints
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        // Waitlist endpoints
        crate::rest::routes::waitlist::register,
        // Blog endpoints
        crate::rest::routes::posts::list,
        crate::rest::routes::posts::get_by_slug,
        // Blog admin endpoints
        crate::rest::routes::admin::list_all,
        crate::rest::routes::admin::create,
        crate::rest::routes::admin::update,
        crate::rest::routes::admin::delete,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            ErrorResponse,
            LeadRecord,
            SubmissionResult,
            BlogPost,
            BlogListResponse,
            PostStatus,
            BlogPostInput,
            PostUpdate,
        )
    ),
    tags(
        (name = "Health", description = "Health check and status endpoints"),
        (name = "Waitlist", description = "Early access registration"),
        (name = "Blog", description = "Published blog posts"),
        (name = "Blog Admin", description = "Blog post management"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
