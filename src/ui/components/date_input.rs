use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by the date input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInputEvent {
  /// Edited text submitted with Enter, not yet parsed
  Submitted(String),
}

/// Date/time input for the base date.
///
/// Shows the store's value until Enter starts an edit; while editing it
/// owns the buffer and swallows every key.
#[derive(Debug, Clone, Default)]
pub struct DateTimeInput {
  editing: bool,
  buffer: String,
  cursor: usize,
}

impl DateTimeInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_editing(&self) -> bool {
    self.editing
  }

  /// Start editing from the currently displayed value
  pub fn begin_edit(&mut self, current: &str) {
    self.editing = true;
    self.buffer = current.to_string();
    self.cursor = self.buffer.len();
  }

  pub fn cancel(&mut self) {
    self.editing = false;
    self.buffer.clear();
    self.cursor = 0;
  }

  fn accepts(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | ':' | 'T' | ' ' | '+' | 'Z')
  }

  /// Handle a key event. `current` is the formatted store value.
  pub fn handle_key(&mut self, key: KeyEvent, current: &str) -> KeyResult<DateInputEvent> {
    if !self.editing {
      return match key.code {
        KeyCode::Enter => {
          self.begin_edit(current);
          KeyResult::Handled
        }
        _ => KeyResult::NotHandled,
      };
    }

    match key.code {
      KeyCode::Esc => self.cancel(),
      KeyCode::Enter => {
        let value = std::mem::take(&mut self.buffer);
        self.cancel();
        return KeyResult::Event(DateInputEvent::Submitted(value));
      }
      KeyCode::Backspace if self.cursor > 0 => {
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
      }
      KeyCode::Delete if self.cursor < self.buffer.len() => {
        self.buffer.remove(self.cursor);
      }
      KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
      KeyCode::Home => self.cursor = 0,
      KeyCode::End => self.cursor = self.buffer.len(),
      KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
      }
      KeyCode::Char(c) if Self::accepts(c) => {
        self.buffer.insert(self.cursor, c);
        self.cursor += 1;
      }
      _ => {}
    }
    KeyResult::Handled
  }

  pub fn render(
    &self,
    frame: &mut Frame,
    area: Rect,
    current: &str,
    focused: bool,
    is_default: bool,
  ) {
    let block = super::filter_block(" Base date ", focused, is_default);

    let line = if self.editing {
      let (before, after) = self.buffer.split_at(self.cursor);
      Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled("_", Style::default().fg(Color::Yellow)),
        Span::raw(after.to_string()),
      ])
    } else {
      Line::from(Span::styled(current.to_string(), Style::default().fg(Color::White)))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_enter_starts_edit_with_current_value() {
    let mut input = DateTimeInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Char('1')), "x"), KeyResult::NotHandled);
    assert_eq!(
      input.handle_key(key(KeyCode::Enter), "2024-03-10T12:30:00"),
      KeyResult::Handled
    );
    assert!(input.is_editing());

    let result = input.handle_key(key(KeyCode::Enter), "ignored");
    assert_eq!(
      result,
      KeyResult::Event(DateInputEvent::Submitted("2024-03-10T12:30:00".to_string()))
    );
    assert!(!input.is_editing());
  }

  #[test]
  fn test_edit_and_submit() {
    let mut input = DateTimeInput::new();
    input.begin_edit("2024-03-10T12:30:00");
    for _ in 0..8 {
      input.handle_key(key(KeyCode::Backspace), "");
    }
    for c in "09:15:00".chars() {
      input.handle_key(key(KeyCode::Char(c)), "");
    }
    assert_eq!(
      input.handle_key(key(KeyCode::Enter), ""),
      KeyResult::Event(DateInputEvent::Submitted("2024-03-10T09:15:00".to_string()))
    );
  }

  #[test]
  fn test_rejects_letters_and_swallows_keys() {
    let mut input = DateTimeInput::new();
    input.begin_edit("");
    assert_eq!(input.handle_key(key(KeyCode::Char('q')), ""), KeyResult::Handled);
    assert_eq!(input.handle_key(key(KeyCode::Tab), ""), KeyResult::Handled);
    input.handle_key(key(KeyCode::Char('2')), "");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter), ""),
      KeyResult::Event(DateInputEvent::Submitted("2".to_string()))
    );
  }

  #[test]
  fn test_escape_cancels_without_event() {
    let mut input = DateTimeInput::new();
    input.begin_edit("2024-03-10T12:30:00");
    input.handle_key(key(KeyCode::Char('9')), "");
    assert_eq!(input.handle_key(key(KeyCode::Esc), ""), KeyResult::Handled);
    assert!(!input.is_editing());
  }

  #[test]
  fn test_ctrl_u_clears_before_cursor() {
    let mut input = DateTimeInput::new();
    input.begin_edit("2024-03-10T12:30:00");
    for _ in 0..8 {
      input.handle_key(key(KeyCode::Left), "");
    }
    input.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), "");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter), ""),
      KeyResult::Event(DateInputEvent::Submitted("12:30:00".to_string()))
    );
  }
}
