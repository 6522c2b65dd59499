//! In-memory blog post store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{generate_slug, BlogError, BlogPost, BlogPostInput, PostUpdate};

/// Largest page size served by `list_published`
pub const MAX_PAGE_SIZE: usize = 100;

/// One page of published posts
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogListResponse {
    pub posts: Vec<BlogPost>,
    pub total_count: usize,
    pub has_more: bool,
}

/// Holds every post, drafts included
#[derive(Debug, Default)]
pub struct BlogStore {
    posts: Vec<BlogPost>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    fn slug_in_use(&self, slug: &str, except: Option<Uuid>) -> bool {
        self.posts
            .iter()
            .any(|p| p.slug == slug && Some(p.post_id) != except)
    }

    /// Published posts, newest `publish_date` first.
    ///
    /// `page` is 1-based. `search` matches title or content, case-insensitively.
    pub fn list_published(
        &self,
        page: usize,
        limit: usize,
        search: Option<&str>,
    ) -> BlogListResponse {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matching: Vec<&BlogPost> = self
            .posts
            .iter()
            .filter(|p| p.is_published())
            .filter(|p| match &needle {
                Some(n) => {
                    p.title.to_lowercase().contains(n) || p.content.to_lowercase().contains(n)
                }
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));

        let total_count = matching.len();
        let shown = page.saturating_mul(limit);
        let posts = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .cloned()
            .collect();

        BlogListResponse {
            posts,
            total_count,
            has_more: total_count > shown,
        }
    }

    /// A published post by slug; drafts are never returned
    pub fn get_published_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts
            .iter()
            .find(|p| p.slug == slug && p.is_published())
    }

    pub fn get(&self, post_id: Uuid) -> Option<&BlogPost> {
        self.posts.iter().find(|p| p.post_id == post_id)
    }

    /// Every post, newest `created_at` first
    pub fn all_posts(&self) -> Vec<BlogPost> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    /// Store a new post.
    ///
    /// The slug comes from the input or, when empty, from the title. A slug
    /// already in use gets a `-{unix_millis}` suffix.
    pub fn create(&mut self, input: BlogPostInput) -> Result<BlogPost, BlogError> {
        if input.title.trim().is_empty() {
            return Err(BlogError::Invalid("title is required".to_string()));
        }

        let mut slug = match input.slug.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => generate_slug(&input.title),
        };
        if slug.is_empty() {
            return Err(BlogError::Invalid(
                "title must contain letters or digits".to_string(),
            ));
        }

        let now = Utc::now();
        if self.slug_in_use(&slug, None) {
            slug = format!("{slug}-{}", now.timestamp_millis());
            debug!(slug = %slug, "slug collision, using suffixed slug");
        }

        let post = BlogPost {
            post_id: Uuid::new_v4(),
            created_at: now,
            title: input.title,
            content: input.content,
            author: input.author,
            publish_date: input.publish_date.unwrap_or(now),
            image_urls: input.image_urls,
            video_urls: input.video_urls,
            slug,
            status: input.status,
            meta_description: input.meta_description,
        };
        info!(post_id = %post.post_id, slug = %post.slug, "created blog post");
        self.posts.push(post.clone());
        Ok(post)
    }

    /// Apply a partial update
    pub fn update(&mut self, post_id: Uuid, update: PostUpdate) -> Result<BlogPost, BlogError> {
        let slug = update.slug.as_deref().map(str::trim);
        if let Some(slug) = slug {
            if slug.is_empty() {
                return Err(BlogError::Invalid("slug cannot be empty".to_string()));
            }
            if self.slug_in_use(slug, Some(post_id)) {
                return Err(BlogError::SlugTaken(slug.to_string()));
            }
        }
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BlogError::Invalid("title is required".to_string()));
        }

        let post = self
            .posts
            .iter_mut()
            .find(|p| p.post_id == post_id)
            .ok_or_else(|| BlogError::NotFound(post_id.to_string()))?;

        if let Some(title) = update.title {
            post.title = title;
        }
        if let Some(content) = update.content {
            post.content = content;
        }
        if let Some(author) = update.author {
            post.author = author;
        }
        if let Some(publish_date) = update.publish_date {
            post.publish_date = publish_date;
        }
        if let Some(image_urls) = update.image_urls {
            post.image_urls = image_urls;
        }
        if let Some(video_urls) = update.video_urls {
            post.video_urls = video_urls;
        }
        if let Some(slug) = slug {
            post.slug = slug.to_string();
        }
        if let Some(status) = update.status {
            post.status = status;
        }
        if let Some(meta) = update.meta_description {
            post.meta_description = Some(meta);
        }

        info!(post_id = %post_id, "updated blog post");
        Ok(post.clone())
    }

    pub fn delete(&mut self, post_id: Uuid) -> Result<(), BlogError> {
        let before = self.posts.len();
        self.posts.retain(|p| p.post_id != post_id);
        if self.posts.len() == before {
            return Err(BlogError::NotFound(post_id.to_string()));
        }
        info!(post_id = %post_id, "deleted blog post");
        Ok(())
    }
}
