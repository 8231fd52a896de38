use super::KeyResult;
use crate::filters::{SelectOption, SelectionItem};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Events emitted by the multi-select that parent needs to handle
#[derive(Debug, Clone, PartialEq)]
pub enum MultiSelectEvent {
  /// The full new selection, in display order
  Changed(Vec<SelectionItem>),
}

/// Controlled multi-select tag picker.
///
/// The selected value is never stored here: callers pass the current
/// selection on every call, and changes come back as events for the
/// caller to write wherever the value lives.
#[derive(Debug, Clone)]
pub struct MultiSelect {
  placeholder: &'static str,
  open: bool,
  cursor: usize,
}

impl MultiSelect {
  pub fn new(placeholder: &'static str) -> Self {
    Self {
      placeholder,
      open: false,
      cursor: 0,
    }
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn close(&mut self) {
    self.open = false;
  }

  /// Selection with `option` toggled: removed if present, appended if not
  fn toggled(value: &[SelectOption], option: &SelectOption) -> Vec<SelectionItem> {
    if value.iter().any(|v| v.value == option.value) {
      value
        .iter()
        .filter(|v| v.value != option.value)
        .map(SelectionItem::from)
        .collect()
    } else {
      value
        .iter()
        .chain(std::iter::once(option))
        .map(SelectionItem::from)
        .collect()
    }
  }

  /// Handle a key event against the current selection and the options
  pub fn handle_key(
    &mut self,
    key: KeyEvent,
    value: &[SelectOption],
    options: &[SelectOption],
  ) -> KeyResult<MultiSelectEvent> {
    if !self.open {
      return match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => {
          self.open = true;
          self.cursor = 0;
          KeyResult::Handled
        }
        // Drop the last tag, like backspacing in a tag field
        KeyCode::Backspace if !value.is_empty() => KeyResult::Event(MultiSelectEvent::Changed(
          value[..value.len() - 1]
            .iter()
            .map(SelectionItem::from)
            .collect(),
        )),
        _ => KeyResult::NotHandled,
      };
    }

    match key.code {
      KeyCode::Esc => {
        self.open = false;
        KeyResult::Handled
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !options.is_empty() {
          self.cursor = (self.cursor + 1) % options.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !options.is_empty() {
          self.cursor = if self.cursor == 0 {
            options.len() - 1
          } else {
            self.cursor - 1
          };
        }
        KeyResult::Handled
      }
      KeyCode::Enter | KeyCode::Char(' ') => match options.get(self.cursor) {
        Some(option) => KeyResult::Event(MultiSelectEvent::Changed(Self::toggled(value, option))),
        None => KeyResult::Handled,
      },
      // Let focus movement through; the dropdown closes behind it
      KeyCode::Tab | KeyCode::BackTab => {
        self.open = false;
        KeyResult::NotHandled
      }
      _ => KeyResult::Handled,
    }
  }

  fn tag_spans(option: &SelectOption) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    if let Some(icon) = option.icon {
      spans.push(Span::styled(
        format!("{} ", icon.glyph()),
        Style::default().fg(Color::White).bg(Color::Blue),
      ));
    }
    spans.push(Span::styled(
      format!("{} ", option.label),
      Style::default().fg(Color::White).bg(Color::Blue),
    ));
    spans
  }

  /// Render the collapsed control showing the selected tags
  pub fn render(
    &self,
    frame: &mut Frame,
    area: Rect,
    value: &[SelectOption],
    focused: bool,
    is_default: bool,
  ) {
    let arrow = if self.open { " ▴ " } else { " ▾ " };
    let block = super::filter_block(arrow, focused, is_default);

    let line = if value.is_empty() {
      Line::from(Span::styled(
        self.placeholder,
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      let mut spans = Vec::new();
      for (idx, option) in value.iter().enumerate() {
        if idx > 0 {
          spans.push(Span::raw(" "));
        }
        spans.extend(Self::tag_spans(option));
      }
      Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
  }

  /// Render the open dropdown below `anchor`, clipped to `bounds`
  pub fn render_dropdown(
    &self,
    frame: &mut Frame,
    anchor: Rect,
    bounds: Rect,
    value: &[SelectOption],
    options: &[SelectOption],
  ) {
    if !self.open {
      return;
    }

    let (content_width, content_height) = dropdown_size(options);
    let width = content_width.max(anchor.width).min(bounds.width);
    let y = anchor.y.saturating_add(anchor.height);
    let height = content_height
      .max(3)
      .min(bounds.bottom().saturating_sub(y));
    if height < 3 {
      return;
    }
    let x = anchor.x.min(bounds.right().saturating_sub(width));
    let area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = options
      .iter()
      .map(|option| {
        let checked = value.iter().any(|v| v.value == option.value);
        let mut spans = vec![Span::styled(
          if checked { "✓ " } else { "  " },
          Style::default().fg(Color::Green),
        )];
        if let Some(icon) = option.icon {
          spans.push(Span::styled(
            format!("{} ", icon.glyph()),
            Style::default().fg(Color::Gray),
          ));
        }
        spans.push(Span::styled(
          option.label.clone(),
          Style::default().fg(Color::Cyan),
        ));
        ListItem::new(Line::from(spans))
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.cursor));

    frame.render_stateful_widget(list, area, &mut state);
  }
}

/// Unclipped dropdown size: widest label plus check mark, icon and
/// borders, one row per option plus borders. Saturates at `u16::MAX`.
fn dropdown_size(options: &[SelectOption]) -> (u16, u16) {
  let max_label = options
    .iter()
    .map(|o| o.label.chars().count())
    .max()
    .unwrap_or(10);
  let width = u16::try_from(max_label)
    .unwrap_or(u16::MAX)
    .saturating_add(10);
  let height = u16::try_from(options.len())
    .unwrap_or(u16::MAX)
    .saturating_add(2);
  (width, height)
}
