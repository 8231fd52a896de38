mod auto_refresh;
mod date_input;
mod key_result;
mod multi_select;
mod num_runs_select;

pub use auto_refresh::{AutoRefreshEvent, AutoRefreshToggle};
pub use date_input::{DateInputEvent, DateTimeInput};
pub use key_result::KeyResult;
pub use multi_select::{MultiSelect, MultiSelectEvent};
pub use num_runs_select::{NumRunsEvent, NumRunsSelect};

use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders};

/// Bordered block for a filter control. Controls holding a non-default
/// value get a thick blue border; focus turns it yellow.
pub fn filter_block(title: &'static str, focused: bool, is_default: bool) -> Block<'static> {
  let color = match (focused, is_default) {
    (true, _) => Color::Yellow,
    (false, false) => Color::LightBlue,
    (false, true) => Color::DarkGray,
  };
  let border_type = if is_default {
    BorderType::Plain
  } else {
    BorderType::Thick
  };

  Block::default()
    .borders(Borders::ALL)
    .border_type(border_type)
    .border_style(Style::default().fg(color))
    .title(title)
}
