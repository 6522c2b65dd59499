//! End-to-end wizard tests against the in-process waitlist registry
//!
//! These tests drive the wizard the way a front end would and verify:
//! - Step gating and error placement
//! - Single-flight submission
//! - Analytics events for each phase of a submission

use std::sync::{Arc, Mutex};

use mira::lead::{Advance, Field, LeadRecord, Submission, Validator, WizardState};
use mira::services::analytics::{FieldInteraction, SubmissionStatus};
use mira::services::{AnalyticsSink, NoopSink, WaitlistRegistry, WaitlistService};

// ─── Test Helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingSink {
    submissions: Mutex<Vec<SubmissionStatus>>,
    blurs: Mutex<Vec<String>>,
}

impl AnalyticsSink for RecordingSink {
    fn field_interaction(
        &self,
        field_id: &str,
        _field_name: &str,
        interaction: FieldInteraction,
        _value: Option<&str>,
    ) {
        if interaction == FieldInteraction::Blur {
            self.blurs.lock().unwrap().push(field_id.to_string());
        }
    }

    fn form_submission(&self, _: &str, _: &str, _: &LeadRecord, status: SubmissionStatus) {
        self.submissions.lock().unwrap().push(status);
    }
}

fn fill(wizard: &mut WizardState, email: &str) {
    wizard.set_field(Field::FirstName, "Jo");
    wizard.set_field(Field::LastName, "Doe");
    assert_eq!(wizard.next(), Advance::Moved(1));
    wizard.set_field(Field::Email, email);
    assert_eq!(wizard.next(), Advance::Moved(2));
    wizard.set_field(Field::Website, "x.com");
}

// ─── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_two_leads_then_duplicate() {
    let registry = WaitlistRegistry::default();

    for email in ["a@x.com", "b@x.com"] {
        let mut wizard = WizardState::default();
        fill(&mut wizard, email);
        assert!(matches!(
            wizard.submit(&registry).await,
            Submission::Succeeded { .. }
        ));
    }
    assert_eq!(registry.count().await, 2);

    let mut wizard = WizardState::default();
    fill(&mut wizard, " A@X.com ");
    let state = wizard.submit(&registry).await.clone();
    assert!(matches!(state, Submission::Failed { .. }));
    assert_eq!(wizard.current_step(), 1);
    assert!(wizard.error_for(Field::Email).is_some());
    // Other values survive for a corrected retry
    assert_eq!(wizard.record().first_name, "Jo");
    assert_eq!(registry.count().await, 2);

    wizard.set_field(Field::Email, "c@x.com");
    assert!(wizard.error_for(Field::Email).is_none());
    wizard.next();
    let state = wizard.submit(&registry).await.clone();
    assert!(matches!(state, Submission::Succeeded { .. }));
    assert_eq!(registry.count().await, 3);
}

#[tokio::test]
async fn test_blocked_step_never_reaches_registry() {
    let registry = WaitlistRegistry::default();
    let mut wizard = WizardState::default();

    wizard.set_field(Field::FirstName, "Jo");
    assert_eq!(wizard.next(), Advance::Blocked);
    assert_eq!(
        wizard.error_for(Field::LastName),
        Some("Last name is required")
    );

    // Jumping straight to submit from step 0 still gates on the step
    assert_eq!(*wizard.submit(&registry).await, Submission::Idle);
    assert_eq!(registry.count().await, 0);
}

#[tokio::test]
async fn test_strict_instagram_blocks_last_step() {
    let registry = WaitlistRegistry::default();
    let mut wizard = WizardState::new(Validator::strict(), Arc::new(NoopSink));
    fill(&mut wizard, "jo@x.com");
    wizard.set_field(Field::Instagram, "https://example.com/jo");

    assert_eq!(*wizard.submit(&registry).await, Submission::Idle);
    assert!(wizard.error_for(Field::Instagram).is_some());

    wizard.set_field(Field::Instagram, "instagram.com/jo");
    assert!(matches!(
        wizard.submit(&registry).await,
        Submission::Succeeded { .. }
    ));
    let entries = registry.entries().await;
    assert_eq!(
        entries[0].instagram_url.as_deref(),
        Some("https://instagram.com/jo")
    );
    assert_eq!(entries[0].website, "https://x.com");
}

#[tokio::test]
async fn test_single_flight_across_tasks() {
    let registry = Arc::new(WaitlistRegistry::default());
    let mut wizard = WizardState::default();
    fill(&mut wizard, "jo@x.com");

    let record = wizard.begin_submit().expect("first submit starts");
    assert!(wizard.begin_submit().is_none());
    assert!(wizard.begin_submit().is_none());

    let service: Arc<dyn WaitlistService> = registry.clone();
    let outcome = tokio::spawn(async move { service.register(&record).await })
        .await
        .unwrap();
    wizard.complete_submit(outcome);

    assert!(matches!(wizard.submission(), Submission::Succeeded { .. }));
    assert_eq!(registry.count().await, 1);
}

#[tokio::test]
async fn test_analytics_phases() {
    let sink = Arc::new(RecordingSink::default());
    let registry = WaitlistRegistry::default();

    let mut wizard = WizardState::new(Validator::default(), sink.clone());
    fill(&mut wizard, "jo@x.com");
    wizard.blur(Field::Website);
    wizard.submit(&registry).await;

    let mut again = WizardState::new(Validator::default(), sink.clone());
    fill(&mut again, "jo@x.com");
    again.submit(&registry).await;

    assert_eq!(
        *sink.submissions.lock().unwrap(),
        vec![
            SubmissionStatus::Attempt,
            SubmissionStatus::Success,
            SubmissionStatus::Attempt,
            SubmissionStatus::Error,
        ]
    );
    assert_eq!(*sink.blurs.lock().unwrap(), vec!["website".to_string()]);
}
