use ratatui::prelude::Color;

/// Known run types. Anything the server sends that we don't recognize
/// lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunType {
  Manual,
  Backfill,
  Scheduled,
  DatasetTriggered,
  Unknown,
}

impl RunType {
  pub fn from_tag(tag: &str) -> Self {
    match tag {
      "manual" => RunType::Manual,
      "backfill" => RunType::Backfill,
      "scheduled" => RunType::Scheduled,
      "dataset_triggered" => RunType::DatasetTriggered,
      _ => RunType::Unknown,
    }
  }
}

/// Icon drawn next to a run-type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunIcon {
  Play,
  GoBack,
  Schedule,
  Database,
  Info,
}

impl RunIcon {
  /// Single-cell glyph used in the terminal
  pub fn glyph(&self) -> &'static str {
    match self {
      RunIcon::Play => "▶",
      RunIcon::GoBack => "↺",
      RunIcon::Schedule => "◷",
      RunIcon::Database => "≡",
      RunIcon::Info => "ⓘ",
    }
  }

  pub fn color(&self) -> Color {
    match self {
      RunIcon::Play => Color::Green,
      RunIcon::GoBack => Color::Magenta,
      RunIcon::Schedule => Color::Cyan,
      RunIcon::Database => Color::Yellow,
      RunIcon::Info => Color::Gray,
    }
  }
}

/// Icon per known run type. `Unknown` is intentionally absent and falls
/// through to `RunIcon::Info`.
pub const RUN_TYPE_ICONS: &[(RunType, RunIcon)] = &[
  (RunType::Manual, RunIcon::Play),
  (RunType::Backfill, RunIcon::GoBack),
  (RunType::Scheduled, RunIcon::Schedule),
  (RunType::DatasetTriggered, RunIcon::Database),
];

/// Resolve the display icon for a run-type tag. Never fails.
pub fn resolve_icon(tag: &str) -> RunIcon {
  let run_type = RunType::from_tag(tag);
  RUN_TYPE_ICONS
    .iter()
    .find(|(known, _)| *known == run_type)
    .map(|(_, icon)| *icon)
    .unwrap_or(RunIcon::Info)
}
