//! Terminal rendering of the lead capture wizard.

use std::collections::BTreeMap;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};

use super::form_field::TextInput;
use crate::lead::{Field, Submission, WizardState, STEPS};

/// Rows used by one field: label, input, error
const FIELD_HEIGHT: u16 = 3;

/// Input widgets and focus for the wizard screen
pub struct WizardView {
    inputs: BTreeMap<Field, TextInput>,
    /// Index of the focused field within the current step
    focus: usize,
}

impl Default for WizardView {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardView {
    pub fn new() -> Self {
        let inputs = Field::all()
            .iter()
            .map(|field| {
                (
                    *field,
                    TextInput::new(field.placeholder(), Some(field.max_length())),
                )
            })
            .collect();
        Self { inputs, focus: 0 }
    }

    /// Field that currently has keyboard focus
    pub fn focused_field(&self, wizard: &WizardState) -> Field {
        let fields = wizard.current_fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn input_mut(&mut self, field: Field) -> Option<&mut TextInput> {
        self.inputs.get_mut(&field)
    }

    /// Move focus within the step; returns the newly focused field
    pub fn focus_next(&mut self, wizard: &WizardState) -> Field {
        let len = wizard.current_fields().len();
        self.focus = (self.focus + 1) % len;
        self.focused_field(wizard)
    }

    pub fn focus_prev(&mut self, wizard: &WizardState) -> Field {
        let len = wizard.current_fields().len();
        self.focus = (self.focus + len - 1) % len;
        self.focused_field(wizard)
    }

    /// Focus the first field of the current step, or the first field with an error
    pub fn reset_focus(&mut self, wizard: &WizardState) {
        self.focus = wizard
            .current_fields()
            .iter()
            .position(|f| wizard.error_for(*f).is_some())
            .unwrap_or(0);
    }

    /// Copy record values into the inputs (after a reset)
    pub fn sync_from(&mut self, wizard: &WizardState) {
        for (field, input) in &mut self.inputs {
            input.set_value(wizard.record().get(*field));
        }
        self.reset_focus(wizard);
    }

    pub fn render(&self, frame: &mut Frame, wizard: &WizardState) {
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "Mira",
                    Style::default()
                        .fg(Color::LightMagenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Early Access "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        match wizard.submission() {
            Submission::Succeeded { message } => self.render_success(frame, inner, message),
            _ => self.render_form_step(frame, inner, wizard),
        }
    }

    fn render_form_step(&self, frame: &mut Frame, area: Rect, wizard: &WizardState) {
        let fields = wizard.current_fields();
        let fields_height = FIELD_HEIGHT * fields.len() as u16;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1),             // Step title
                Constraint::Length(1),             // Progress
                Constraint::Length(1),             // Spacer
                Constraint::Length(fields_height), // Fields
                Constraint::Min(2),                // Status banner
                Constraint::Length(1),             // Footer
            ])
            .split(area);

        let step = &STEPS[wizard.current_step()];
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Step {} of {}: ", wizard.current_step() + 1, wizard.step_count()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                step.label,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        frame.render_widget(title, chunks[0]);

        let ratio = (wizard.current_step() + 1) as f64 / wizard.step_count() as f64;
        let progress = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(ratio)
            .label("");
        frame.render_widget(progress, chunks[1]);

        let field_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(FIELD_HEIGHT); fields.len()])
            .split(chunks[3]);

        let focused = self.focused_field(wizard);
        for (field, row) in fields.iter().zip(field_rows.iter()) {
            self.render_field(frame, *row, wizard, *field, *field == focused);
        }

        self.render_status(frame, chunks[4], wizard.submission());

        let forward = if wizard.is_last_step() {
            " join waitlist  "
        } else {
            " next  "
        };
        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" switch field  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(forward),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" back  "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[5]);
    }

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        wizard: &WizardState,
        field: Field,
        focused: bool,
    ) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(field.label(), label_style)),
            rows[0],
        );

        if let Some(input) = self.inputs.get(&field) {
            input.render(frame, rows[1], focused);
        }

        if let Some(error) = wizard.error_for(field) {
            frame.render_widget(
                Paragraph::new(Span::styled(error, Style::default().fg(Color::Red))),
                rows[2],
            );
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, submission: &Submission) {
        let line = match submission {
            Submission::InFlight => Line::from(Span::styled(
                "Joining waitlist...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            Submission::Failed { message, .. } => Line::from(vec![
                Span::styled("✗ ", Style::default().fg(Color::Red)),
                Span::styled(message.as_str(), Style::default().fg(Color::Red)),
            ]),
            Submission::Idle | Submission::Succeeded { .. } => return,
        };
        frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
    }

    fn render_success(&self, frame: &mut Frame, area: Rect, message: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([
                Constraint::Length(2), // Headline
                Constraint::Min(2),    // Message
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let headline = Paragraph::new(Line::from(Span::styled(
            "✓ You're on the list!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(headline, chunks[0]);

        frame.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            chunks[1],
        );

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" register someone else  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[2]);
    }
}

/// Centered rectangle taking the given percentages of `r`
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
