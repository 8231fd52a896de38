use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by the run-count selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumRunsEvent {
  /// Newly chosen count, in the raw form the store accepts
  Changed(String),
}

/// Selector cycling through the configured run counts
#[derive(Debug, Clone)]
pub struct NumRunsSelect {
  choices: Vec<u32>,
}

impl NumRunsSelect {
  pub fn new(choices: Vec<u32>) -> Self {
    Self { choices }
  }

  /// Step from `current`. A current value that isn't one of the choices
  /// steps to the first or last choice.
  fn step(&self, current: u32, forward: bool) -> Option<u32> {
    if self.choices.is_empty() {
      return None;
    }
    let last = self.choices.len() - 1;
    let next = match self.choices.iter().position(|c| *c == current) {
      Some(idx) if forward => (idx + 1) % self.choices.len(),
      Some(0) => last,
      Some(idx) => idx - 1,
      None if forward => 0,
      None => last,
    };
    self.choices.get(next).copied()
  }

  pub fn handle_key(&mut self, key: KeyEvent, current: u32) -> KeyResult<NumRunsEvent> {
    let forward = match key.code {
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => true,
      KeyCode::Left | KeyCode::Char('h') => false,
      _ => return KeyResult::NotHandled,
    };

    match self.step(current, forward) {
      Some(n) if n != current => KeyResult::Event(NumRunsEvent::Changed(n.to_string())),
      _ => KeyResult::Handled,
    }
  }

  /// Never drawn with the non-default emphasis; the count isn't a filter
  pub fn render(&self, frame: &mut Frame, area: Rect, current: u32, focused: bool) {
    let block = super::filter_block(" Runs ", focused, true);
    let line = Line::from(vec![
      Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
      Span::styled(current.to_string(), Style::default().fg(Color::White).bold()),
      Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
      Paragraph::new(line).alignment(Alignment::Center).block(block),
      area,
    );
  }
}
