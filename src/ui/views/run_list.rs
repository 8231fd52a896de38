use crate::filters::{resolve_icon, DisplayTimezone};
use crate::runs::DagRun;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{state_color, truncate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

/// Table of the runs the filter bar currently selects
#[derive(Debug, Default)]
pub struct RunListView {
  table_state: TableState,
}

impl RunListView {
  pub fn new() -> Self {
    Self::default()
  }

  /// Move the selection; returns false for keys it doesn't use
  pub fn handle_key(&mut self, key: KeyEvent, len: usize) -> bool {
    let delta: i64 = match key.code {
      KeyCode::Char('j') | KeyCode::Down => 1,
      KeyCode::Char('k') | KeyCode::Up => -1,
      KeyCode::Char('g') | KeyCode::Home => {
        self.table_state.select(Some(0));
        return true;
      }
      _ => return false,
    };

    if len > 0 {
      let current = self.table_state.selected().unwrap_or(0) as i64;
      let next = (current + delta).rem_euclid(len as i64) as usize;
      self.table_state.select(Some(next));
    }
    true
  }

  pub fn render(
    &mut self,
    frame: &mut Frame,
    area: Rect,
    runs: &[&DagRun],
    tz: DisplayTimezone,
  ) {
    let block = Block::default()
      .title(format!(" Runs ({}) ", runs.len()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if runs.is_empty() {
      let empty = Paragraph::new("No runs match the current filters")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(block);
      frame.render_widget(empty, area);
      return;
    }

    ensure_valid_selection(&mut self.table_state, runs.len());

    let rows: Vec<Row> = runs
      .iter()
      .map(|run| {
        let icon = resolve_icon(&run.run_type);
        Row::new(vec![
          Line::from(vec![
            Span::styled(format!("{} ", icon.glyph()), Style::default().fg(icon.color())),
            Span::raw(run.run_type.clone()),
          ]),
          Line::from(truncate(&run.run_id, 48)),
          Line::from(Span::styled(
            run.state.clone(),
            Style::default().fg(state_color(&run.state)),
          )),
          Line::from(tz.format_local(run.execution_date)),
        ])
      })
      .collect();

    let header = Row::new(vec!["TYPE", "RUN ID", "STATE", "EXECUTION DATE"])
      .style(Style::default().fg(Color::Yellow).bold());

    let table = Table::new(
      rows,
      [
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(20),
      ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }
}
