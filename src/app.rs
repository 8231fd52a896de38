use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::filters::{Clock, DisplayTimezone, FilterDefaults, FilterStore, QueryFilterStore};
use crate::runs::{self, DagRun};
use crate::ui;
use crate::ui::components::KeyResult;
use crate::ui::renderfns::FooterMode;
use crate::ui::views::{FilterBarView, RunListView};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Main application state
pub struct App {
  title: String,

  /// Canonical filter values
  store: QueryFilterStore,

  filter_bar: FilterBarView,
  run_list: RunListView,
  runs: Vec<DagRun>,
  runs_file: Option<PathBuf>,

  /// Ticks between reloads while auto-refresh is on
  refresh_ticks: u32,
  ticks_since_refresh: u32,

  should_quit: bool,
}

impl App {
  /// Build the dashboard. Filter defaults are captured from `clock` here,
  /// once, and stay fixed for the session.
  pub fn new(config: Config, runs: Vec<DagRun>, query: &str, clock: &dyn Clock) -> Self {
    let defaults = FilterDefaults::capture(clock, config.filters.default_num_runs);
    let timezone = config.timezone;

    let store = QueryFilterStore::from_query(
      query,
      defaults,
      timezone,
      config.filters.run_types.clone(),
      config.filters.run_states.clone(),
    );

    info!(
      runs = runs.len(),
      %timezone,
      query = %store.query_string(),
      "dashboard ready"
    );

    let interval = Duration::from_secs(config.auto_refresh.interval_secs);
    let refresh_ticks = u32::try_from(interval.as_millis() / TICK_RATE.as_millis())
      .unwrap_or(u32::MAX)
      .max(1);

    Self {
      title: config.title.unwrap_or_else(|| "DAG runs".to_string()),
      store,
      filter_bar: FilterBarView::new(
        defaults,
        timezone,
        config.filters.num_runs,
        config.auto_refresh.enabled,
      ),
      run_list: RunListView::new(),
      runs,
      runs_file: config.runs_file,
      refresh_ticks,
      ticks_since_refresh: 0,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(TICK_RATE);

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => self.on_tick(),
        Some(Event::Resize) => {}
        None => break,
      }
    }
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    if self.filter_bar.handle_key(key, &mut self.store) != KeyResult::NotHandled {
      return;
    }

    let visible = self.visible_runs().len();
    if self.run_list.handle_key(key, visible) {
      return;
    }

    match key.code {
      KeyCode::Char('q') => self.should_quit = true,
      _ => debug!(?key, "unhandled key"),
    }
  }

  /// Count ticks while auto-refresh is on and reload once per interval
  fn on_tick(&mut self) {
    if !self.filter_bar.auto_refresh_enabled() {
      self.ticks_since_refresh = 0;
      return;
    }

    self.ticks_since_refresh += 1;
    if self.ticks_since_refresh >= self.refresh_ticks {
      self.ticks_since_refresh = 0;
      self.reload_runs();
    }
  }

  /// Re-read the runs file. On failure the previous runs stay listed.
  fn reload_runs(&mut self) {
    let Some(path) = &self.runs_file else {
      return;
    };

    match runs::load_runs(path) {
      Ok(runs) => {
        debug!(runs = runs.len(), "runs reloaded");
        self.runs = runs;
      }
      Err(e) => warn!(path = %path.display(), "failed to reload runs: {}", e),
    }
  }

  fn visible_runs(&self) -> Vec<&DagRun> {
    runs::visible_runs(&self.runs, self.store.filters())
  }

  // Accessors for UI rendering
  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn timezone(&self) -> DisplayTimezone {
    self.store.timezone()
  }

  pub fn query_string(&self) -> String {
    self.store.query_string()
  }

  pub fn footer_mode(&self) -> FooterMode {
    if self.filter_bar.is_capturing() {
      FooterMode::Editing
    } else if self.filter_bar.focus().is_some() {
      FooterMode::Filters
    } else {
      FooterMode::Runs
    }
  }

  pub fn render_filter_bar(&self, frame: &mut Frame, area: Rect) {
    self.filter_bar.render(frame, area, &self.store);
  }

  pub fn render_filter_overlay(&self, frame: &mut Frame, area: Rect, bounds: Rect) {
    self.filter_bar.render_overlay(frame, area, bounds, &self.store);
  }

  pub fn render_runs(&mut self, frame: &mut Frame, area: Rect) {
    let visible = runs::visible_runs(&self.runs, self.store.filters());
    let timezone = self.store.timezone();
    self.run_list.render(frame, area, &visible, timezone);
  }

  /// Load the runs file named in config, if any
  pub fn load_runs(config: &Config) -> Result<Vec<DagRun>> {
    match &config.runs_file {
      Some(path) => runs::load_runs(path),
      None => Ok(Vec::new()),
    }
  }
}
