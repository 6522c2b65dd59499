//! In-process waitlist registry.
//!
//! Validates, sanitizes and stores registrations, rejecting duplicate emails.
//! The REST server exposes it over HTTP, and it can be handed to the wizard
//! directly as a `WaitlistService`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::waitlist::{SubmissionResult, WaitlistError, WaitlistService, DUPLICATE_EMAIL_ERROR};
use crate::lead::{normalize_url, sanitize_input, LeadRecord, Validator};

pub const INVALID_FORM_MESSAGE: &str = "Please fix the errors in your form";
pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already registered for early access.";
pub const JOINED_MESSAGE: &str =
    "Successfully joined the waitlist! Check your email for confirmation.";

/// A stored registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Lowercased
    pub email: String,
    pub website: String,
    pub instagram_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    fn from_record(record: &LeadRecord) -> Self {
        let instagram = record.instagram.trim();
        Self {
            id: Uuid::new_v4(),
            first_name: sanitize_input(&record.first_name),
            last_name: sanitize_input(&record.last_name),
            email: sanitize_input(&record.email.to_lowercase()),
            website: normalize_url(&sanitize_input(&record.website)),
            instagram_url: (!instagram.is_empty())
                .then(|| normalize_url(&sanitize_input(instagram))),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct WaitlistRegistry {
    validator: Validator,
    entries: RwLock<Vec<WaitlistEntry>>,
}

impl WaitlistRegistry {
    pub fn new(validator: Validator) -> Self {
        Self {
            validator,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Validate and store a registration
    pub async fn register_lead(&self, record: &LeadRecord) -> SubmissionResult {
        let errors = self.validator.validate_record(record);
        if let Some(first) = errors.into_values().next() {
            return SubmissionResult::failure(INVALID_FORM_MESSAGE, first);
        }

        let entry = WaitlistEntry::from_record(record);

        // Check and insert under one write lock so concurrent duplicates can't both land
        let mut entries = self.entries.write().await;
        if entries.iter().any(|e| e.email == entry.email) {
            info!("rejected duplicate waitlist registration");
            return SubmissionResult::failure(DUPLICATE_EMAIL_MESSAGE, DUPLICATE_EMAIL_ERROR);
        }

        info!(id = %entry.id, "new waitlist registration");
        entries.push(entry);
        SubmissionResult::success(JOINED_MESSAGE)
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn entries(&self) -> Vec<WaitlistEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl WaitlistService for WaitlistRegistry {
    fn name(&self) -> &str {
        "in-process"
    }

    async fn register(&self, record: &LeadRecord) -> Result<SubmissionResult, WaitlistError> {
        Ok(self.register_lead(record).await)
    }
}
