//! Terminal front end for the lead capture wizard.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::Config;
use crate::lead::{Advance, Submission, WizardState};
use crate::services::{AnalyticsSink, SubmissionResult, WaitlistError, WaitlistService};
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::ui::WizardView;

type Outcome = Result<SubmissionResult, WaitlistError>;

const PAGE_NAME: &str = "waitlist";
const SECTION_ID: &str = "final-cta";
const SECTION_NAME: &str = "Final CTA Section";
const SUBMIT_BUTTON_ID: &str = "waitlist-submit";
const SUBMIT_BUTTON_TEXT: &str = "Join the waitlist";

pub struct App {
    wizard: WizardState,
    view: WizardView,
    service: Arc<dyn WaitlistService>,
    analytics: Arc<dyn AnalyticsSink>,
    tick_rate: Duration,
    should_quit: bool,
    result_tx: mpsc::UnboundedSender<Outcome>,
    result_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl App {
    pub fn new(config: &Config, service: Arc<dyn WaitlistService>) -> Self {
        Self::with_analytics(config, service, config.analytics_sink())
    }

    /// Like `new`, with an explicit analytics sink
    pub fn with_analytics(
        config: &Config,
        service: Arc<dyn WaitlistService>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            wizard: WizardState::new(config.validator(), Arc::clone(&analytics)),
            view: WizardView::new(),
            service,
            analytics,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            should_quit: false,
            result_tx,
            result_rx,
        }
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let mut guard = TerminalGuard::new()?;

        self.analytics.page_view(PAGE_NAME, Some(SECTION_ID));
        self.analytics.section_view(SECTION_ID, SECTION_NAME);
        self.wizard.focus(self.view.focused_field(&self.wizard));
        info!(service = self.service.name(), "waitlist form started");

        while !self.should_quit {
            let (view, wizard) = (&self.view, &self.wizard);
            guard.terminal_mut().draw(|f| view.render(f, wizard))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.drain_results();
        }

        Ok(())
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if matches!(self.wizard.submission(), Submission::Succeeded { .. }) {
            match key.code {
                KeyCode::Enter => {
                    self.wizard.restart();
                    self.view.sync_from(&self.wizard);
                    self.wizard.focus(self.view.focused_field(&self.wizard));
                }
                KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        let focused = self.view.focused_field(&self.wizard);
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.wizard.blur(focused);
                let next = self.view.focus_next(&self.wizard);
                self.wizard.focus(next);
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.wizard.blur(focused);
                let prev = self.view.focus_prev(&self.wizard);
                self.wizard.focus(prev);
            }
            KeyCode::Enter => {
                if self.wizard.submission().is_in_flight() {
                    debug!("submission in flight, ignoring enter");
                } else if self.wizard.is_last_step() {
                    self.wizard.blur(focused);
                    self.start_submission();
                } else {
                    self.wizard.blur(focused);
                    if let Advance::Moved(step) = self.wizard.next() {
                        debug!(step, "moved to next step");
                    }
                    self.view.reset_focus(&self.wizard);
                    self.wizard.focus(self.view.focused_field(&self.wizard));
                }
            }
            KeyCode::Esc => {
                if self.wizard.current_step() == 0 {
                    self.should_quit = true;
                } else {
                    self.wizard.back();
                    self.view.reset_focus(&self.wizard);
                    self.wizard.focus(self.view.focused_field(&self.wizard));
                }
            }
            code if !self.wizard.submission().is_in_flight() => {
                if let Some(input) = self.view.input_mut(focused) {
                    if input.handle_key(code) {
                        let value = input.value().to_string();
                        self.wizard.set_field(focused, value);
                    }
                }
            }
            _ => {}
        }
    }

    /// Start a submission; the service call runs on its own task
    fn start_submission(&mut self) {
        if self.wizard.submission().is_in_flight() {
            return;
        }
        self.analytics
            .cta_click(SUBMIT_BUTTON_ID, SUBMIT_BUTTON_TEXT, SECTION_ID);

        let Some(record) = self.wizard.begin_submit() else {
            // Gate failure may have moved to another step
            self.view.reset_focus(&self.wizard);
            return;
        };

        let service = Arc::clone(&self.service);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let outcome = service.register(&record).await;
            let _ = tx.send(outcome);
        });
    }

    /// Apply finished submissions; returns true if any arrived
    pub fn drain_results(&mut self) -> bool {
        let mut applied = false;
        while let Ok(outcome) = self.result_rx.try_recv() {
            self.apply_outcome(outcome);
            applied = true;
        }
        applied
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.wizard.complete_submit(outcome);
        self.view.sync_from(&self.wizard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::{Field, LeadRecord};
    use crate::services::analytics::{FieldInteraction, SubmissionStatus};
    use crate::services::DUPLICATE_EMAIL_ERROR;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowService {
        calls: AtomicUsize,
        result: SubmissionResult,
    }

    #[async_trait]
    impl WaitlistService for SlowService {
        fn name(&self) -> &str {
            "slow"
        }

        async fn register(&self, _: &LeadRecord) -> Result<SubmissionResult, WaitlistError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(self.result.clone())
        }
    }

    #[derive(Default)]
    struct ClickCounter {
        clicks: AtomicUsize,
    }

    impl AnalyticsSink for ClickCounter {
        fn field_interaction(&self, _: &str, _: &str, _: FieldInteraction, _: Option<&str>) {}

        fn form_submission(&self, _: &str, _: &str, _: &LeadRecord, _: SubmissionStatus) {}

        fn cta_click(&self, _: &str, _: &str, _: &str) {
            self.clicks.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn app_with(result: SubmissionResult) -> (App, Arc<SlowService>) {
        let service = Arc::new(SlowService {
            calls: AtomicUsize::new(0),
            result,
        });
        let mut config = Config::default();
        config.analytics.enabled = false;
        (App::new(&config, service.clone()), service)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_all_steps(app: &mut App) {
        type_str(app, "Jo");
        press(app, KeyCode::Tab);
        type_str(app, "Doe");
        press(app, KeyCode::Enter);
        type_str(app, "jo@x.com");
        press(app, KeyCode::Enter);
        type_str(app, "x.com");
    }

    async fn wait_for_outcome(app: &mut App) {
        let outcome = tokio::time::timeout(Duration::from_secs(5), app.result_rx.recv())
            .await
            .expect("submission timed out")
            .expect("channel open");
        app.apply_outcome(outcome);
    }

    #[tokio::test]
    async fn test_keyboard_flow_submits_once() {
        let (mut app, service) = app_with(SubmissionResult::success("Welcome"));
        fill_all_steps(&mut app);
        assert_eq!(app.wizard().current_step(), 2);

        press(&mut app, KeyCode::Enter);
        assert!(app.wizard().submission().is_in_flight());
        press(&mut app, KeyCode::Enter);

        wait_for_outcome(&mut app).await;
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *app.wizard().submission(),
            Submission::Succeeded {
                message: "Welcome".to_string()
            }
        );

        // Enter on the success screen starts over
        press(&mut app, KeyCode::Enter);
        assert_eq!(*app.wizard().submission(), Submission::Idle);
        assert!(app.wizard().record().is_empty());
    }

    #[tokio::test]
    async fn test_enter_while_in_flight_records_one_click() {
        let service = Arc::new(SlowService {
            calls: AtomicUsize::new(0),
            result: SubmissionResult::success("Welcome"),
        });
        let counter = Arc::new(ClickCounter::default());
        let mut app = App::with_analytics(&Config::default(), service.clone(), counter.clone());
        fill_all_steps(&mut app);

        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(counter.clicks.load(Ordering::SeqCst), 1);

        // Esc and edits are ignored until the outcome lands
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.wizard().current_step(), 2);
        assert_eq!(app.wizard().record().website, "x.com");

        wait_for_outcome(&mut app).await;
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_enter_blocked_on_invalid_step() {
        let (mut app, service) = app_with(SubmissionResult::success("Welcome"));
        type_str(&mut app, "J");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.wizard().current_step(), 0);
        assert!(app.wizard().error_for(Field::FirstName).is_some());
        assert!(app.wizard().error_for(Field::LastName).is_some());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_returns_to_email_step() {
        let (mut app, _service) = app_with(SubmissionResult::failure(
            "This email is already registered for early access.",
            DUPLICATE_EMAIL_ERROR,
        ));
        fill_all_steps(&mut app);
        press(&mut app, KeyCode::Enter);
        wait_for_outcome(&mut app).await;

        assert_eq!(app.wizard().current_step(), 1);
        assert!(app.wizard().error_for(Field::Email).is_some());

        // Editing the email clears the stale error
        press(&mut app, KeyCode::Backspace);
        assert!(app.wizard().error_for(Field::Email).is_none());
    }

    #[tokio::test]
    async fn test_esc_goes_back_then_quits() {
        let (mut app, _service) = app_with(SubmissionResult::success("ok"));
        type_str(&mut app, "Jo");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "Doe");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.wizard().current_step(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.wizard().current_step(), 0);
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let (mut app, _service) = app_with(SubmissionResult::success("ok"));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
