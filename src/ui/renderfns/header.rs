use crate::filters::DisplayTimezone;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title and display timezone
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, tz: DisplayTimezone) {
  let header = Line::from(vec![
    Span::styled(" runfilter ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Yellow).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", tz), Style::default().fg(Color::White)),
  ]);

  let paragraph = Paragraph::new(header).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
