//! Lead capture wizard state machine.
//!
//! `WizardState` combines the step controller (gated Next, free Back) and the
//! submission coordinator (single-flight submit with a terminal
//! success/failure state). Submission is split into `begin_submit`, which
//! flips the state to `InFlight` synchronously, and `complete_submit`, which
//! interprets the service outcome; `submit` wires both around one awaited
//! service call.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::field::{step_of, Field, LeadRecord, CONTACT_STEP, STEPS};
use super::validation::Validator;
use crate::services::analytics::{AnalyticsSink, FieldInteraction, NoopSink, SubmissionStatus};
use crate::services::waitlist::{SubmissionResult, WaitlistError, WaitlistService};

/// Form id reported to analytics
pub const FORM_ID: &str = "waitlist_form";
/// Form name reported to analytics
pub const FORM_NAME: &str = "Waitlist Form";

/// Banner message used when the service call itself fails
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";
/// Field error shown on `email` for a duplicate registration
pub const DUPLICATE_EMAIL_FIELD_ERROR: &str = "This email is already registered";

/// Submission lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Submission {
    #[default]
    Idle,
    InFlight,
    Succeeded {
        message: String,
    },
    Failed {
        message: String,
        error_code: Option<String>,
    },
}

impl Submission {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Submission::InFlight)
    }

    /// `Succeeded` or `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Submission::Succeeded { .. } | Submission::Failed { .. }
        )
    }
}

/// Result of a Next action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved forward to the given step
    Moved(usize),
    /// A field of the current step failed validation
    Blocked,
    /// Already on the last step; the forward action there is Submit
    AtLastStep,
}

/// State of one lead capture form session
pub struct WizardState {
    record: LeadRecord,
    current_step: usize,
    field_errors: BTreeMap<Field, String>,
    submission: Submission,
    validator: Validator,
    analytics: Arc<dyn AnalyticsSink>,
}

impl std::fmt::Debug for WizardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardState")
            .field("record", &self.record)
            .field("current_step", &self.current_step)
            .field("field_errors", &self.field_errors)
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(Validator::default(), Arc::new(NoopSink))
    }
}

impl WizardState {
    /// Create a fresh wizard on the first step
    pub fn new(validator: Validator, analytics: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            record: LeadRecord::default(),
            current_step: 0,
            field_errors: BTreeMap::new(),
            submission: Submission::Idle,
            validator,
            analytics,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        STEPS.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= STEPS.len()
    }

    /// Fields shown on the current step
    pub fn current_fields(&self) -> &'static [Field] {
        STEPS[self.current_step].fields
    }

    pub fn field_errors(&self) -> &BTreeMap<Field, String> {
        &self.field_errors
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    // ─── Field interaction ──────────────────────────────────────────────────

    /// Store an edited value; clears a stale error on that field.
    ///
    /// Ignored while a submission is in flight.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        if self.submission.is_in_flight() {
            warn!(field = field.name(), "submission in flight, ignoring edit");
            return;
        }
        let value = value.into();
        self.analytics.field_interaction(
            field.name(),
            field.name(),
            FieldInteraction::Change,
            Some(&value),
        );
        self.record.set(field, value);
        self.field_errors.remove(&field);
    }

    pub fn focus(&self, field: Field) {
        self.analytics
            .field_interaction(field.name(), field.name(), FieldInteraction::Focus, None);
    }

    /// Leave a field: validate it and set or clear its error
    pub fn blur(&mut self, field: Field) -> Option<&str> {
        if self.submission.is_in_flight() {
            return self.error_for(field);
        }
        let value = self.record.get(field).to_string();
        self.analytics.field_interaction(
            field.name(),
            field.name(),
            FieldInteraction::Blur,
            Some(&value),
        );
        match self.validator.validate(field, &value) {
            Some(message) => {
                self.field_errors.insert(field, message);
            }
            None => {
                self.field_errors.remove(&field);
            }
        }
        self.error_for(field)
    }

    // ─── Step controller ────────────────────────────────────────────────────

    /// Validate the current step's fields, recording their errors.
    ///
    /// Errors of other steps are left untouched.
    fn validate_current_step(&mut self) -> bool {
        let mut valid = true;
        for field in STEPS[self.current_step].fields {
            match self.validator.validate(*field, self.record.get(*field)) {
                Some(message) => {
                    self.field_errors.insert(*field, message);
                    valid = false;
                }
                None => {
                    self.field_errors.remove(field);
                }
            }
        }
        valid
    }

    /// Move forward if the current step validates
    pub fn next(&mut self) -> Advance {
        if self.submission.is_in_flight() {
            warn!("submission in flight, ignoring next");
            return Advance::Blocked;
        }
        if !self.validate_current_step() {
            debug!(step = self.current_step, "step blocked by validation");
            return Advance::Blocked;
        }
        if self.is_last_step() {
            return Advance::AtLastStep;
        }
        self.current_step += 1;
        debug!(step = self.current_step, "advanced to step");
        Advance::Moved(self.current_step)
    }

    /// Move back one step; never touches errors.
    ///
    /// Returns the unchanged step while a submission is in flight.
    pub fn back(&mut self) -> usize {
        if self.submission.is_in_flight() {
            warn!("submission in flight, ignoring back");
            return self.current_step;
        }
        self.current_step = self.current_step.saturating_sub(1);
        self.current_step
    }

    // ─── Submission coordinator ─────────────────────────────────────────────

    /// Start a submission.
    ///
    /// Returns the record to send, or `None` when a submission is already in
    /// flight or validation fails. On `Some` the state is already `InFlight`.
    pub fn begin_submit(&mut self) -> Option<LeadRecord> {
        if self.submission.is_in_flight() {
            warn!("submission already in flight, ignoring submit");
            return None;
        }

        if !self.validate_current_step() {
            debug!(step = self.current_step, "submit blocked by validation");
            return None;
        }

        // Earlier steps can only be invalid if the record was edited out of band
        let errors = self.validator.validate_record(&self.record);
        if let Some(first) = errors.keys().next() {
            self.current_step = step_of(*first);
            self.field_errors.extend(errors);
            debug!(step = self.current_step, "submit moved to first invalid step");
            return None;
        }

        self.submission = Submission::InFlight;
        self.analytics
            .form_submission(FORM_ID, FORM_NAME, &self.record, SubmissionStatus::Attempt);
        info!("waitlist submission started");
        Some(self.record.clone())
    }

    /// Apply the outcome of the in-flight submission
    pub fn complete_submit(&mut self, outcome: Result<SubmissionResult, WaitlistError>) {
        if !self.submission.is_in_flight() {
            warn!("received submission result with nothing in flight, ignoring");
            return;
        }

        match outcome {
            Ok(result) if result.success => {
                self.analytics.form_submission(
                    FORM_ID,
                    FORM_NAME,
                    &self.record,
                    SubmissionStatus::Success,
                );
                info!("waitlist submission succeeded");
                self.record = LeadRecord::default();
                self.field_errors.clear();
                self.current_step = 0;
                self.submission = Submission::Succeeded {
                    message: result.message,
                };
            }
            Ok(result) => {
                self.analytics.form_submission(
                    FORM_ID,
                    FORM_NAME,
                    &self.record,
                    SubmissionStatus::Error,
                );
                if result.is_duplicate_email() {
                    info!("waitlist submission rejected: email already registered");
                    self.field_errors
                        .insert(Field::Email, DUPLICATE_EMAIL_FIELD_ERROR.to_string());
                    self.current_step = CONTACT_STEP;
                } else {
                    warn!(error = ?result.error, "waitlist submission failed");
                }
                self.submission = Submission::Failed {
                    message: result.message,
                    error_code: result.error,
                };
            }
            Err(err) => {
                self.analytics.form_submission(
                    FORM_ID,
                    FORM_NAME,
                    &self.record,
                    SubmissionStatus::Error,
                );
                warn!(error = %err, "waitlist service call failed");
                self.submission = Submission::Failed {
                    message: GENERIC_FAILURE_MESSAGE.to_string(),
                    error_code: None,
                };
            }
        }
    }

    /// Validate, call the service once, and apply its outcome
    pub async fn submit(&mut self, service: &dyn WaitlistService) -> &Submission {
        let Some(record) = self.begin_submit() else {
            return &self.submission;
        };
        debug!(service = service.name(), "registering lead");
        let outcome = service.register(&record).await;
        self.complete_submit(outcome);
        &self.submission
    }

    /// Start over after a terminal state; never contacts the service
    pub fn restart(&mut self) {
        if self.submission.is_in_flight() {
            warn!("cannot restart while a submission is in flight");
            return;
        }
        self.record = LeadRecord::default();
        self.field_errors.clear();
        self.current_step = 0;
        self.submission = Submission::Idle;
    }
}
