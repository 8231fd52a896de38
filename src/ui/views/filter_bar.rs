use crate::filters::{
  apply_selection, run_type_options, to_multi_select_options, DisplayTimezone, FieldDefaults,
  FilterDefaults, FilterStore, SelectOption, SelectionItem,
};
use crate::ui::components::{
  filter_block, AutoRefreshEvent, AutoRefreshToggle, DateInputEvent, DateTimeInput, KeyResult,
  MultiSelect, MultiSelectEvent, NumRunsEvent, NumRunsSelect,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tracing::info;

/// Filter bar control that currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFocus {
  BaseDate,
  RunType,
  RunState,
  ClearFilters,
  NumRuns,
  AutoRefresh,
}

impl FilterFocus {
  const ORDER: [FilterFocus; 6] = [
    FilterFocus::BaseDate,
    FilterFocus::RunType,
    FilterFocus::RunState,
    FilterFocus::ClearFilters,
    FilterFocus::NumRuns,
    FilterFocus::AutoRefresh,
  ];

  fn index(self) -> usize {
    Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
  }

  fn next(self) -> Self {
    Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
  }

  fn prev(self) -> Self {
    Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
  }
}

/// Everything the bar shows, derived from the store on each render
#[derive(Debug, Clone)]
struct FilterBarModel {
  flags: FieldDefaults,
  base_date: String,
  num_runs: u32,
  run_type: Vec<SelectOption>,
  run_type_options: Vec<SelectOption>,
  run_state: Vec<SelectOption>,
  run_state_options: Vec<SelectOption>,
}

/// The run-listing filter bar: base date, run type, run state, clear
/// filters, run count and the auto-refresh switch.
///
/// Holds only focus and widget-local state. Filter values are read from
/// the store on every call and every interaction writes back to it at
/// most once. The auto-refresh switch is not a filter and never touches
/// the store.
pub struct FilterBarView {
  defaults: FilterDefaults,
  timezone: DisplayTimezone,
  focus: Option<FilterFocus>,
  base_date: DateTimeInput,
  run_type: MultiSelect,
  run_state: MultiSelect,
  num_runs: NumRunsSelect,
  auto_refresh: AutoRefreshToggle,
}

impl FilterBarView {
  pub fn new(
    defaults: FilterDefaults,
    timezone: DisplayTimezone,
    num_runs_choices: Vec<u32>,
    auto_refresh: bool,
  ) -> Self {
    Self {
      defaults,
      timezone,
      focus: None,
      base_date: DateTimeInput::new(),
      run_type: MultiSelect::new("All Run Types"),
      run_state: MultiSelect::new("All Run States"),
      num_runs: NumRunsSelect::new(num_runs_choices),
      auto_refresh: AutoRefreshToggle::new(auto_refresh),
    }
  }

  pub fn focus(&self) -> Option<FilterFocus> {
    self.focus
  }

  pub fn auto_refresh_enabled(&self) -> bool {
    self.auto_refresh.is_enabled()
  }

  /// True while the date is being edited or a dropdown is open
  pub fn is_capturing(&self) -> bool {
    self.base_date.is_editing() || self.run_type.is_open() || self.run_state.is_open()
  }

  /// Per-field default flags for the store's current values
  pub fn field_defaults<S: FilterStore + ?Sized>(&self, store: &S) -> FieldDefaults {
    FieldDefaults::compute(store.filters(), &self.defaults, self.timezone)
  }

  /// Whether "Clear Filters" can be pressed
  pub fn can_clear<S: FilterStore + ?Sized>(&self, store: &S) -> bool {
    !self.field_defaults(store).all()
  }

  fn model<S: FilterStore + ?Sized>(&self, store: &S) -> FilterBarModel {
    let filters = store.filters();
    FilterBarModel {
      flags: self.field_defaults(store),
      base_date: self.timezone.format_local(filters.base_date),
      num_runs: filters.num_runs,
      run_type: run_type_options(filters.run_type.as_deref()),
      run_type_options: run_type_options(Some(filters.run_type_options.as_slice())),
      run_state: to_multi_select_options(filters.run_state.as_deref()),
      run_state_options: to_multi_select_options(Some(filters.run_state_options.as_slice())),
    }
  }

  fn set_focus(&mut self, focus: Option<FilterFocus>) {
    self.base_date.cancel();
    self.run_type.close();
    self.run_state.close();
    self.focus = focus;
  }

  pub(crate) fn on_run_type_selection<S: FilterStore + ?Sized>(
    &self,
    store: &mut S,
    items: &[SelectionItem],
  ) {
    apply_selection(items, |values| store.on_run_type_change(values));
  }

  pub(crate) fn on_run_state_selection<S: FilterStore + ?Sized>(
    &self,
    store: &mut S,
    items: &[SelectionItem],
  ) {
    apply_selection(items, |values| store.on_run_state_change(values));
  }

  fn clear_filters<S: FilterStore + ?Sized>(&self, store: &mut S) {
    if self.can_clear(store) {
      store.clear_filters();
    }
  }

  /// Handle a key event, writing to the store when a control changes
  pub fn handle_key<S: FilterStore + ?Sized>(
    &mut self,
    key: KeyEvent,
    store: &mut S,
  ) -> KeyResult<()> {
    let Some(focus) = self.focus else {
      return match key.code {
        KeyCode::Tab => {
          self.set_focus(Some(FilterFocus::BaseDate));
          KeyResult::Handled
        }
        KeyCode::BackTab => {
          self.set_focus(Some(FilterFocus::AutoRefresh));
          KeyResult::Handled
        }
        _ => KeyResult::NotHandled,
      };
    };

    let model = self.model(&*store);

    let result = match focus {
      FilterFocus::BaseDate => match self.base_date.handle_key(key, &model.base_date) {
        KeyResult::Event(DateInputEvent::Submitted(value)) => {
          store.on_base_date_change(&value);
          KeyResult::Handled
        }
        KeyResult::Handled => KeyResult::Handled,
        KeyResult::NotHandled => KeyResult::NotHandled,
      },
      FilterFocus::RunType => {
        match self
          .run_type
          .handle_key(key, &model.run_type, &model.run_type_options)
        {
          KeyResult::Event(MultiSelectEvent::Changed(items)) => {
            self.on_run_type_selection(store, &items);
            KeyResult::Handled
          }
          KeyResult::Handled => KeyResult::Handled,
          KeyResult::NotHandled => KeyResult::NotHandled,
        }
      }
      FilterFocus::RunState => {
        match self
          .run_state
          .handle_key(key, &model.run_state, &model.run_state_options)
        {
          KeyResult::Event(MultiSelectEvent::Changed(items)) => {
            self.on_run_state_selection(store, &items);
            KeyResult::Handled
          }
          KeyResult::Handled => KeyResult::Handled,
          KeyResult::NotHandled => KeyResult::NotHandled,
        }
      }
      FilterFocus::ClearFilters => match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
          self.clear_filters(store);
          KeyResult::Handled
        }
        _ => KeyResult::NotHandled,
      },
      FilterFocus::NumRuns => match self.num_runs.handle_key(key, model.num_runs) {
        KeyResult::Event(NumRunsEvent::Changed(value)) => {
          store.on_num_runs_change(&value);
          KeyResult::Handled
        }
        KeyResult::Handled => KeyResult::Handled,
        KeyResult::NotHandled => KeyResult::NotHandled,
      },
      FilterFocus::AutoRefresh => match self.auto_refresh.handle_key(key) {
        KeyResult::Event(AutoRefreshEvent::Toggled(enabled)) => {
          info!(enabled, "auto-refresh toggled");
          KeyResult::Handled
        }
        KeyResult::Handled => KeyResult::Handled,
        KeyResult::NotHandled => KeyResult::NotHandled,
      },
    };

    if result != KeyResult::NotHandled {
      return result;
    }

    match key.code {
      KeyCode::Tab => self.set_focus(Some(focus.next())),
      KeyCode::BackTab => self.set_focus(Some(focus.prev())),
      KeyCode::Esc => self.set_focus(None),
      _ => return KeyResult::NotHandled,
    }
    KeyResult::Handled
  }

  fn control_areas(area: Rect) -> [Rect; 6] {
    Layout::horizontal([
      Constraint::Length(23), // Base date
      Constraint::Min(20),    // Run types
      Constraint::Min(20),    // Run states
      Constraint::Length(17), // Clear filters
      Constraint::Length(12), // Run count
      Constraint::Length(11), // Auto-refresh
    ])
    .areas(area)
  }

  fn render_clear_button(&self, frame: &mut Frame, area: Rect, enabled: bool) {
    let focused = self.focus == Some(FilterFocus::ClearFilters);
    let block = filter_block("", focused, true);
    let style = if enabled {
      Style::default().fg(Color::Cyan).bold()
    } else {
      Style::default().fg(Color::DarkGray)
    };
    let button = Paragraph::new(Span::styled("Clear Filters", style))
      .alignment(Alignment::Center)
      .block(block);
    frame.render_widget(button, area);
  }

  /// Render the bar. Needs three rows.
  pub fn render<S: FilterStore + ?Sized>(&self, frame: &mut Frame, area: Rect, store: &S) {
    let model = self.model(store);
    let [date_area, run_type_area, run_state_area, clear_area, num_runs_area, refresh_area] =
      Self::control_areas(area);

    self.base_date.render(
      frame,
      date_area,
      &model.base_date,
      self.focus == Some(FilterFocus::BaseDate),
      model.flags.base_date,
    );
    self.run_type.render(
      frame,
      run_type_area,
      &model.run_type,
      self.focus == Some(FilterFocus::RunType),
      model.flags.run_type,
    );
    self.run_state.render(
      frame,
      run_state_area,
      &model.run_state,
      self.focus == Some(FilterFocus::RunState),
      model.flags.run_state,
    );
    self.render_clear_button(frame, clear_area, !model.flags.all());
    self.num_runs.render(
      frame,
      num_runs_area,
      model.num_runs,
      self.focus == Some(FilterFocus::NumRuns),
    );
    self.auto_refresh.render(
      frame,
      refresh_area,
      self.focus == Some(FilterFocus::AutoRefresh),
    );
  }

  /// Render open dropdowns on top of whatever is in `bounds`
  pub fn render_overlay<S: FilterStore + ?Sized>(
    &self,
    frame: &mut Frame,
    area: Rect,
    bounds: Rect,
    store: &S,
  ) {
    if !self.run_type.is_open() && !self.run_state.is_open() {
      return;
    }
    let model = self.model(store);
    let [_, run_type_area, run_state_area, _, _, _] = Self::control_areas(area);

    self.run_type.render_dropdown(
      frame,
      run_type_area,
      bounds,
      &model.run_type,
      &model.run_type_options,
    );
    self.run_state.render_dropdown(
      frame,
      run_state_area,
      bounds,
      &model.run_state,
      &model.run_state_options,
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::filters::state::{FilterState, FixedClock};
  use chrono::{DateTime, TimeZone, Utc};
  use crossterm::event::KeyModifiers;

  #[derive(Debug, Clone, PartialEq, Eq)]
  enum Call {
    BaseDate(String),
    NumRuns(String),
    RunType(Vec<String>),
    RunState(Vec<String>),
    Clear,
  }

  /// Store that records every write and applies it naively
  struct RecordingStore {
    filters: FilterState,
    initial: FilterState,
    calls: Vec<Call>,
  }

  impl RecordingStore {
    fn new() -> Self {
      let filters = FilterState {
        base_date: start(),
        num_runs: 25,
        run_type: None,
        run_state: None,
        run_type_options: vec!["backfill".into(), "scheduled".into(), "manual".into()],
        run_state_options: vec!["queued".into(), "success".into(), "failed".into()],
      };
      Self {
        initial: filters.clone(),
        filters,
        calls: Vec::new(),
      }
    }
  }

  impl FilterStore for RecordingStore {
    fn filters(&self) -> &FilterState {
      &self.filters
    }

    fn on_base_date_change(&mut self, value: &str) {
      self.calls.push(Call::BaseDate(value.to_string()));
      if let Some(date) = DisplayTimezone::utc().parse_local(value) {
        self.filters.base_date = date;
      }
    }

    fn on_num_runs_change(&mut self, value: &str) {
      self.calls.push(Call::NumRuns(value.to_string()));
      if let Ok(n) = value.parse() {
        self.filters.num_runs = n;
      }
    }

    fn on_run_type_change(&mut self, values: Vec<String>) {
      self.calls.push(Call::RunType(values.clone()));
      self.filters.run_type = Some(values);
    }

    fn on_run_state_change(&mut self, values: Vec<String>) {
      self.calls.push(Call::RunState(values.clone()));
      self.filters.run_state = Some(values);
    }

    fn clear_filters(&mut self) {
      self.calls.push(Call::Clear);
      self.filters = self.initial.clone();
    }
  }

  fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 30, 15).unwrap()
  }

  fn view() -> FilterBarView {
    FilterBarView::new(
      FilterDefaults::capture(&FixedClock(start()), 25),
      DisplayTimezone::utc(),
      vec![5, 25, 50],
      false,
    )
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn press(view: &mut FilterBarView, store: &mut RecordingStore, codes: &[KeyCode]) {
    for code in codes {
      view.handle_key(key(*code), store);
    }
  }

  fn payload(json: &str) -> Vec<SelectionItem> {
    serde_json::from_str(json).unwrap()
  }

  #[test]
  fn test_unfocused_bar_passes_keys_through() {
    let mut view = view();
    let mut store = RecordingStore::new();
    assert_eq!(
      view.handle_key(key(KeyCode::Char('q')), &mut store),
      KeyResult::NotHandled
    );
    assert_eq!(view.handle_key(key(KeyCode::Tab), &mut store), KeyResult::Handled);
    assert_eq!(view.focus(), Some(FilterFocus::BaseDate));
    assert_eq!(view.handle_key(key(KeyCode::Esc), &mut store), KeyResult::Handled);
    assert_eq!(view.focus(), None);
  }

  #[test]
  fn test_focus_cycles_both_ways() {
    let mut view = view();
    let mut store = RecordingStore::new();
    press(&mut view, &mut store, &[KeyCode::BackTab]);
    assert_eq!(view.focus(), Some(FilterFocus::AutoRefresh));
    press(&mut view, &mut store, &[KeyCode::Tab]);
    assert_eq!(view.focus(), Some(FilterFocus::BaseDate));
    press(&mut view, &mut store, &[KeyCode::BackTab]);
    assert_eq!(view.focus(), Some(FilterFocus::AutoRefresh));
    press(&mut view, &mut store, &[KeyCode::BackTab]);
    assert_eq!(view.focus(), Some(FilterFocus::NumRuns));
  }

  #[test]
  fn test_clear_disabled_at_defaults() {
    let mut view = view();
    let mut store = RecordingStore::new();
    assert!(!view.can_clear(&store));

    // None -> AutoRefresh -> NumRuns -> ClearFilters
    press(
      &mut view,
      &mut store,
      &[KeyCode::BackTab, KeyCode::BackTab, KeyCode::BackTab],
    );
    assert_eq!(view.focus(), Some(FilterFocus::ClearFilters));
    press(&mut view, &mut store, &[KeyCode::Enter]);
    assert!(store.calls.is_empty());
  }

  #[test]
  fn test_any_change_enables_clear_once() {
    let mut view = view();
    let mut store = RecordingStore::new();

    // Open run types, toggle "backfill"
    press(
      &mut view,
      &mut store,
      &[KeyCode::Tab, KeyCode::Tab, KeyCode::Enter, KeyCode::Enter],
    );
    assert_eq!(store.calls, vec![Call::RunType(vec!["backfill".to_string()])]);
    assert!(view.can_clear(&store));
    assert!(!view.field_defaults(&store).run_type);

    // Tab closes the dropdown and moves on, twice to reach Clear Filters
    press(&mut view, &mut store, &[KeyCode::Tab, KeyCode::Tab, KeyCode::Enter]);
    assert_eq!(view.focus(), Some(FilterFocus::ClearFilters));
    assert_eq!(
      store.calls.iter().filter(|c| **c == Call::Clear).count(),
      1
    );
    assert!(!view.can_clear(&store));
  }

  #[test]
  fn test_run_count_change_keeps_clear_disabled() {
    let mut view = view();
    let mut store = RecordingStore::new();
    press(
      &mut view,
      &mut store,
      &[KeyCode::BackTab, KeyCode::BackTab, KeyCode::Right],
    );
    assert_eq!(store.calls, vec![Call::NumRuns("50".to_string())]);
    assert_eq!(store.filters.num_runs, 50);
    assert!(view.field_defaults(&store).all());
    assert!(!view.can_clear(&store));

    // Clear Filters stays a no-op
    press(&mut view, &mut store, &[KeyCode::BackTab, KeyCode::Enter]);
    assert_eq!(view.focus(), Some(FilterFocus::ClearFilters));
    assert_eq!(store.calls, vec![Call::NumRuns("50".to_string())]);
  }

  #[test]
  fn test_base_date_edit_writes_raw_input() {
    let mut view = view();
    let mut store = RecordingStore::new();
    press(&mut view, &mut store, &[KeyCode::Tab, KeyCode::Enter]);
    for _ in 0..8 {
      press(&mut view, &mut store, &[KeyCode::Backspace]);
    }
    for c in "08:00:00".chars() {
      press(&mut view, &mut store, &[KeyCode::Char(c)]);
    }
    press(&mut view, &mut store, &[KeyCode::Enter]);

    assert_eq!(
      store.calls,
      vec![Call::BaseDate("2024-03-10T08:00:00".to_string())]
    );
    assert!(!view.field_defaults(&store).base_date);
  }

  #[test]
  fn test_selection_payload_written_in_order() {
    let view = view();
    let mut store = RecordingStore::new();
    view.on_run_type_selection(
      &mut store,
      &payload(r#"[{"value":"manual"},{"value":"backfill"}]"#),
    );
    assert_eq!(
      store.calls,
      vec![Call::RunType(vec!["manual".to_string(), "backfill".to_string()])]
    );
  }

  #[test]
  fn test_malformed_payload_never_written() {
    let view = view();
    let mut store = RecordingStore::new();
    view.on_run_type_selection(&mut store, &payload(r#"[{"value":"manual"},{"label":"x"}]"#));
    view.on_run_state_selection(&mut store, &payload(r#"[{"nope":true}]"#));
    assert!(store.calls.is_empty());
    assert!(!view.can_clear(&store));
  }

  #[test]
  fn test_forward_values_from_store() {
    let view = view();
    let mut store = RecordingStore::new();
    store.filters.run_type = Some(vec!["manual".to_string(), "scheduled".to_string()]);

    let model = view.model(&store);
    let icons: Vec<_> = model.run_type.iter().map(|o| o.icon).collect();
    assert_eq!(
      icons,
      vec![
        Some(crate::filters::icons::RunIcon::Play),
        Some(crate::filters::icons::RunIcon::Schedule)
      ]
    );
    assert!(model.run_state.is_empty());
    assert!(!model.flags.run_type);
    assert_eq!(model.base_date, "2024-03-10T12:30:15");
  }

  #[test]
  fn test_auto_refresh_toggle_never_writes() {
    let mut view = view();
    let mut store = RecordingStore::new();
    assert!(!view.auto_refresh_enabled());

    press(&mut view, &mut store, &[KeyCode::BackTab, KeyCode::Enter]);
    assert_eq!(view.focus(), Some(FilterFocus::AutoRefresh));
    assert!(view.auto_refresh_enabled());
    assert!(store.calls.is_empty());
    assert!(!view.can_clear(&store));

    press(&mut view, &mut store, &[KeyCode::Char(' ')]);
    assert!(!view.auto_refresh_enabled());
  }
}
