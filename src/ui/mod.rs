pub mod components;
pub mod renderfns;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::TableState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header_area, filter_area, list_area, footer_area] = Layout::vertical([
    Constraint::Length(1), // Header
    Constraint::Length(3), // Filter bar
    Constraint::Min(1),    // Runs
    Constraint::Length(1), // Footer
  ])
  .areas(frame.area());

  renderfns::draw_header(frame, header_area, app.title(), app.timezone());
  app.render_filter_bar(frame, filter_area);
  app.render_runs(frame, list_area);
  renderfns::draw_footer(frame, footer_area, &app.query_string(), app.footer_mode());

  // Dropdowns go last so they sit on top of the run table
  app.render_filter_overlay(frame, filter_area, list_area);
}

/// Keep the selection inside `len` rows, selecting the first row if none is
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  match state.selected() {
    _ if len == 0 => state.select(None),
    Some(idx) if idx >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}
