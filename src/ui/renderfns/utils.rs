use ratatui::prelude::Color;

/// Truncate a string to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a run state
pub fn state_color(state: &str) -> Color {
  match state {
    "success" => Color::Green,
    "failed" => Color::Red,
    "running" => Color::LightGreen,
    "queued" => Color::Gray,
    _ => Color::White,
  }
}
