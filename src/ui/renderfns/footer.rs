use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 3] {
  [
    Span::styled(key, Style::default().fg(Color::Cyan)),
    Span::styled(label, Style::default().fg(Color::DarkGray)),
    Span::raw("  "),
  ]
}

/// Which set of key hints to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterMode {
  /// Run table has the keys
  Runs,
  /// A filter control is focused
  Filters,
  /// Date being edited or a dropdown is open
  Editing,
}

/// Draw the footer with key hints and the filters as a query string
pub fn draw_footer(frame: &mut Frame, area: Rect, query: &str, mode: FooterMode) {
  let mut spans = vec![Span::raw(" ")];

  match mode {
    FooterMode::Runs => {
      spans.extend(hint("<tab>", " filters"));
      spans.extend(hint("<j/k>", " nav"));
      spans.extend(hint("<q>", " quit"));
    }
    FooterMode::Filters => {
      spans.extend(hint("<tab>", " next"));
      spans.extend(hint("<enter>", " open/edit"));
      spans.extend(hint("<←/→>", " runs"));
      spans.extend(hint("<esc>", " leave"));
    }
    FooterMode::Editing => {
      spans.extend(hint("<j/k>", " move"));
      spans.extend(hint("<space>", " toggle"));
      spans.extend(hint("<enter>", " apply"));
      spans.extend(hint("<esc>", " close"));
    }
  }

  spans.push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
  let query = if query.is_empty() {
    "(no filters)".to_string()
  } else {
    format!("?{}", query)
  };
  spans.push(Span::styled(query, Style::default().fg(Color::White)));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
