//! Fire-and-forget analytics events.
//!
//! Sinks are called synchronously and never return errors; the wizard never
//! branches on anything a sink does.

use std::collections::BTreeSet;
use std::fmt;

use crate::lead::LeadRecord;

/// Kind of field interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInteraction {
    Focus,
    Blur,
    Change,
}

impl fmt::Display for FieldInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldInteraction::Focus => "focus",
            FieldInteraction::Blur => "blur",
            FieldInteraction::Change => "change",
        })
    }
}

/// Phase of a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Attempt,
    Success,
    Error,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubmissionStatus::Attempt => "attempt",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        })
    }
}

/// Receives analytics events
pub trait AnalyticsSink: Send + Sync {
    fn field_interaction(
        &self,
        field_id: &str,
        field_name: &str,
        interaction: FieldInteraction,
        value: Option<&str>,
    );

    fn form_submission(
        &self,
        form_id: &str,
        form_name: &str,
        data: &LeadRecord,
        status: SubmissionStatus,
    );

    fn page_view(&self, _page_name: &str, _page_section: Option<&str>) {}

    fn section_view(&self, _section_id: &str, _section_name: &str) {}

    fn cta_click(&self, _button_id: &str, _button_text: &str, _page_section: &str) {}

    fn scroll_depth(&self, _percent: u8) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn field_interaction(&self, _: &str, _: &str, _: FieldInteraction, _: Option<&str>) {}

    fn form_submission(&self, _: &str, _: &str, _: &LeadRecord, _: SubmissionStatus) {}
}

/// Emits events as structured tracing records under the `mira::analytics` target.
///
/// Field values are never logged, only whether one was present.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn field_interaction(
        &self,
        field_id: &str,
        field_name: &str,
        interaction: FieldInteraction,
        value: Option<&str>,
    ) {
        tracing::debug!(
            target: "mira::analytics",
            event = "form_interaction",
            field_id,
            field_name,
            interaction = %interaction,
            has_value = value.is_some_and(|v| !v.is_empty()),
        );
    }

    fn form_submission(
        &self,
        form_id: &str,
        form_name: &str,
        data: &LeadRecord,
        status: SubmissionStatus,
    ) {
        tracing::info!(
            target: "mira::analytics",
            event = "form_submit",
            form_id,
            form_name,
            status = %status,
            has_instagram = !data.instagram.trim().is_empty(),
        );
    }

    fn page_view(&self, page_name: &str, page_section: Option<&str>) {
        tracing::info!(
            target: "mira::analytics",
            event = "page_view",
            page_name,
            page_section = page_section.unwrap_or("main"),
        );
    }

    fn section_view(&self, section_id: &str, section_name: &str) {
        tracing::info!(
            target: "mira::analytics",
            event = "section_view",
            section_id,
            section_name,
        );
    }

    fn cta_click(&self, button_id: &str, button_text: &str, page_section: &str) {
        tracing::info!(
            target: "mira::analytics",
            event = "cta_click",
            button_id,
            button_text,
            page_section,
        );
    }

    fn scroll_depth(&self, percent: u8) {
        tracing::info!(target: "mira::analytics", event = "scroll_depth", percent);
    }
}

/// Scroll-depth thresholds reported at most once each
pub const SCROLL_THRESHOLDS: [u8; 4] = [25, 50, 75, 100];

/// Tracks the deepest scroll position and reports newly crossed thresholds
#[derive(Debug, Default)]
pub struct ScrollDepthTracker {
    max_percent: u8,
    reported: BTreeSet<u8>,
}

impl ScrollDepthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll position (0-100) and report crossed thresholds to the sink.
    ///
    /// Returns the thresholds reported by this call.
    pub fn observe(&mut self, percent: u8, sink: &dyn AnalyticsSink) -> Vec<u8> {
        let percent = percent.min(100);
        if percent <= self.max_percent {
            return Vec::new();
        }
        self.max_percent = percent;

        let mut crossed = Vec::new();
        for threshold in SCROLL_THRESHOLDS {
            if percent >= threshold && self.reported.insert(threshold) {
                sink.scroll_depth(threshold);
                crossed.push(threshold);
            }
        }
        crossed
    }

    pub fn max_percent(&self) -> u8 {
        self.max_percent
    }
}
