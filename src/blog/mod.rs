//! Blog posts published alongside the waitlist.

mod store;

pub use store::{BlogListResponse, BlogStore};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

static SLUG_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9 -]").expect("valid slug regex"));
static SLUG_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid slug regex"));
static SLUG_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("valid slug regex"));

/// Publication status of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    #[default]
    Draft,
}

/// A stored blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub author: String,
    pub publish_date: DateTime<Utc>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    pub slug: String,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

/// Fields supplied when creating a post
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BlogPostInput {
    pub title: String,
    pub content: String,
    pub author: String,
    /// Defaults to the creation time
    #[serde(default)]
    pub publish_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    /// Generated from the title when empty
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Partial update of a post; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,
    pub image_urls: Option<Vec<String>>,
    pub video_urls: Option<Vec<String>>,
    pub slug: Option<String>,
    pub status: Option<PostStatus>,
    pub meta_description: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlogError {
    #[error("post '{0}' not found")]
    NotFound(String),

    #[error("invalid post: {0}")]
    Invalid(String),

    #[error("slug '{0}' is already used by another post")]
    SlugTaken(String),
}

/// Turn a title into a URL slug.
///
/// Lowercases, drops everything outside `[a-z0-9 -]`, turns whitespace runs
/// into `-`, collapses repeated dashes and trims them from both ends.
pub fn generate_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let kept = SLUG_DISALLOWED.replace_all(&lower, "");
    let dashed = SLUG_SPACES.replace_all(&kept, "-");
    let collapsed = SLUG_DASHES.replace_all(&dashed, "-");
    collapsed.trim().trim_matches('-').to_string()
}
