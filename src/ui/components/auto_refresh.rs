use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Events emitted by the auto-refresh switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRefreshEvent {
  /// New state after the switch flipped
  Toggled(bool),
}

/// On/off switch for periodically reloading the runs
#[derive(Debug, Clone)]
pub struct AutoRefreshToggle {
  enabled: bool,
}

impl AutoRefreshToggle {
  pub fn new(enabled: bool) -> Self {
    Self { enabled }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<AutoRefreshEvent> {
    match key.code {
      KeyCode::Enter | KeyCode::Char(' ') => {
        self.enabled = !self.enabled;
        KeyResult::Event(AutoRefreshEvent::Toggled(self.enabled))
      }
      _ => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
    let block = super::filter_block(" Refresh ", focused, true);
    let line = if self.enabled {
      Line::from(Span::styled("● on", Style::default().fg(Color::Green).bold()))
    } else {
      Line::from(Span::styled("○ off", Style::default().fg(Color::DarkGray)))
    };
    frame.render_widget(
      Paragraph::new(line).alignment(Alignment::Center).block(block),
      area,
    );
  }
}
