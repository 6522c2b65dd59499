//! Waitlist registration service contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::lead::LeadRecord;

/// Structured error value the service returns for an already registered email
pub const DUPLICATE_EMAIL_ERROR: &str = "Email already exists";

/// Outcome reported by the registration service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
        }
    }

    /// Whether this failure is the duplicate-registration case
    pub fn is_duplicate_email(&self) -> bool {
        !self.success && self.error.as_deref() == Some(DUPLICATE_EMAIL_ERROR)
    }
}

/// Failures of the service call itself (as opposed to a structured failure result)
#[derive(Error, Debug)]
pub enum WaitlistError {
    #[error("waitlist service unreachable: {0}")]
    Network(String),

    #[error("waitlist service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("invalid waitlist response: {0}")]
    InvalidResponse(String),

    #[error("waitlist client misconfigured: {0}")]
    Config(String),
}

/// A service that registers leads on the waitlist
#[async_trait]
pub trait WaitlistService: Send + Sync {
    /// Service name for logs
    fn name(&self) -> &str;

    /// Register a validated record
    async fn register(&self, record: &LeadRecord) -> Result<SubmissionResult, WaitlistError>;
}
