//! Single-line text input widget.

use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Single-line text input with a character-indexed cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters, not bytes
    cursor_pos: usize,
    placeholder: String,
    max_length: Option<usize>,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>, max_length: Option<usize>) -> Self {
        Self {
            value: String::new(),
            cursor_pos: 0,
            placeholder: placeholder.into(),
            max_length,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// Replace the value and move the cursor to the end
    pub fn set_value(&mut self, new_value: &str) {
        self.value = new_value.to_string();
        self.cursor_pos = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Handle a key event, returns true if the value changed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => {
                if self.max_length.map_or(true, |m| self.char_len() < m) {
                    let at = self.byte_index(self.cursor_pos);
                    self.value.insert(at, c);
                    self.cursor_pos += 1;
                    return true;
                }
                false
            }
            KeyCode::Backspace => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                    let at = self.byte_index(self.cursor_pos);
                    self.value.remove(at);
                    return true;
                }
                false
            }
            KeyCode::Delete => {
                if self.cursor_pos < self.char_len() {
                    let at = self.byte_index(self.cursor_pos);
                    self.value.remove(at);
                    return true;
                }
                false
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                if self.cursor_pos < self.char_len() {
                    self.cursor_pos += 1;
                }
                false
            }
            KeyCode::Home => {
                self.cursor_pos = 0;
                false
            }
            KeyCode::End => {
                self.cursor_pos = self.char_len();
                false
            }
            _ => false,
        }
    }

    /// Render the field
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let content = if self.value.is_empty() && !focused {
            Line::from(Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            let mut text = self.value.clone();
            if focused {
                text.insert(self.byte_index(self.cursor_pos), '|');
            }
            let suffix = self
                .max_length
                .map(|m| format!(" ({}/{})", self.char_len(), m))
                .unwrap_or_default();
            Line::from(vec![
                Span::raw(text),
                Span::styled(suffix, Style::default().fg(Color::DarkGray)),
            ])
        };

        let para = Paragraph::new(content).style(Style::default().fg(if focused {
            Color::White
        } else {
            Color::Gray
        }));
        frame.render_widget(para, area);
    }
}
