//! API state management for the REST server.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use tokio::sync::RwLock;

use crate::blog::BlogStore;
use crate::config::Config;
use crate::rest::error::ApiError;
use crate::services::WaitlistRegistry;

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    pub waitlist: Arc<WaitlistRegistry>,
    /// Blog posts (thread-safe read-write access)
    pub blog: Arc<RwLock<BlogStore>>,
    pub config: Arc<Config>,
}

impl ApiState {
    /// Create new API state from config
    pub fn new(config: Config) -> Self {
        Self {
            waitlist: Arc::new(WaitlistRegistry::new(config.validator())),
            blog: Arc::new(RwLock::new(BlogStore::new())),
            config: Arc::new(config),
        }
    }

    /// Check the bearer token of an admin request.
    ///
    /// Admin routes are disabled when no token is configured.
    pub fn authorize_admin(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let expected = match self.config.server.admin_token.as_deref() {
            Some(token) if !token.is_empty() => token,
            _ => {
                return Err(ApiError::Forbidden(
                    "Admin API is disabled; set server.admin_token to enable it".to_string(),
                ))
            }
        };

        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match provided {
            Some(token) if token == expected => Ok(()),
            Some(_) => Err(ApiError::Unauthorized("Invalid admin token".to_string())),
            None => Err(ApiError::Unauthorized(
                "Missing bearer token".to_string(),
            )),
        }
    }
}
