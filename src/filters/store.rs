use super::state::{DisplayTimezone, FilterDefaults, FilterState};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};
use url::form_urlencoded;

pub const BASE_DATE_PARAM: &str = "base_date";
pub const NUM_RUNS_PARAM: &str = "num_runs";
pub const RUN_TYPE_PARAM: &str = "run_type";
pub const RUN_STATE_PARAM: &str = "run_state";

const FILTER_PARAMS: &[&str] = &[
  BASE_DATE_PARAM,
  NUM_RUNS_PARAM,
  RUN_TYPE_PARAM,
  RUN_STATE_PARAM,
];

/// Owner of the canonical filter values.
///
/// The filter bar reads through `filters()` on every render and issues at
/// most one write per user interaction.
pub trait FilterStore {
  fn filters(&self) -> &FilterState;

  /// Raw date input, wall-clock time in the display timezone
  fn on_base_date_change(&mut self, value: &str);

  /// Raw run-count choice
  fn on_num_runs_change(&mut self, value: &str);

  fn on_run_type_change(&mut self, values: Vec<String>);

  fn on_run_state_change(&mut self, values: Vec<String>);

  /// Reset every filter to its default
  fn clear_filters(&mut self);
}

/// Filter store persisted as URL query parameters.
///
/// Parameters it doesn't own are kept untouched and in order. Tag filters
/// are stored as repeated keys; an empty selection removes the key, so an
/// explicit empty selection reads back the same as "never set".
#[derive(Debug, Clone)]
pub struct QueryFilterStore {
  params: Vec<(String, String)>,
  defaults: FilterDefaults,
  timezone: DisplayTimezone,
  run_type_options: Vec<String>,
  run_state_options: Vec<String>,
  filters: FilterState,
}

impl QueryFilterStore {
  /// Restore filters from a query string (leading '?' optional)
  pub fn from_query(
    query: &str,
    defaults: FilterDefaults,
    timezone: DisplayTimezone,
    run_type_options: Vec<String>,
    run_state_options: Vec<String>,
  ) -> Self {
    let query = query.strip_prefix('?').unwrap_or(query);
    let params: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
      .into_owned()
      .collect();

    let filters = derive_filters(&params, &defaults, &run_type_options, &run_state_options);

    Self {
      params,
      defaults,
      timezone,
      run_type_options,
      run_state_options,
      filters,
    }
  }

  /// Current query string, without the leading '?'
  pub fn query_string(&self) -> String {
    form_urlencoded::Serializer::new(String::new())
      .extend_pairs(self.params.iter())
      .finish()
  }

  pub fn timezone(&self) -> DisplayTimezone {
    self.timezone
  }

  fn set_param(&mut self, key: &str, value: String) {
    self.params.retain(|(k, _)| k != key);
    self.params.push((key.to_string(), value));
  }

  fn set_all(&mut self, key: &str, values: Vec<String>) {
    self.params.retain(|(k, _)| k != key);
    self
      .params
      .extend(values.into_iter().map(|v| (key.to_string(), v)));
  }

  fn remove_param(&mut self, key: &str) {
    self.params.retain(|(k, _)| k != key);
  }

  fn refresh(&mut self) {
    self.filters = derive_filters(
      &self.params,
      &self.defaults,
      &self.run_type_options,
      &self.run_state_options,
    );
    debug!(query = %self.query_string(), "filters updated");
  }
}

impl FilterStore for QueryFilterStore {
  fn filters(&self) -> &FilterState {
    &self.filters
  }

  fn on_base_date_change(&mut self, value: &str) {
    if value.trim().is_empty() {
      self.remove_param(BASE_DATE_PARAM);
      self.refresh();
      return;
    }

    match self.timezone.parse_local(value) {
      Some(date) => {
        self.set_param(
          BASE_DATE_PARAM,
          date.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
        self.refresh();
      }
      None => warn!(value, "ignoring unparseable base date"),
    }
  }

  fn on_num_runs_change(&mut self, value: &str) {
    match value.trim().parse::<u32>() {
      Ok(n) if n > 0 => {
        self.set_param(NUM_RUNS_PARAM, n.to_string());
        self.refresh();
      }
      _ => warn!(value, "ignoring invalid run count"),
    }
  }

  fn on_run_type_change(&mut self, values: Vec<String>) {
    self.set_all(RUN_TYPE_PARAM, values);
    self.refresh();
  }

  fn on_run_state_change(&mut self, values: Vec<String>) {
    self.set_all(RUN_STATE_PARAM, values);
    self.refresh();
  }

  fn clear_filters(&mut self) {
    for key in FILTER_PARAMS {
      self.remove_param(key);
    }
    self.refresh();
  }
}

fn derive_filters(
  params: &[(String, String)],
  defaults: &FilterDefaults,
  run_type_options: &[String],
  run_state_options: &[String],
) -> FilterState {
  let base_date = last_param(params, BASE_DATE_PARAM)
    .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
    .map(|d| d.with_timezone(&Utc))
    .unwrap_or_else(|| defaults.base_date());

  let num_runs = last_param(params, NUM_RUNS_PARAM)
    .and_then(|v| v.parse::<u32>().ok())
    .filter(|n| *n > 0)
    .unwrap_or_else(|| defaults.num_runs());

  FilterState {
    base_date,
    num_runs,
    run_type: all_params(params, RUN_TYPE_PARAM),
    run_state: all_params(params, RUN_STATE_PARAM),
    run_type_options: run_type_options.to_vec(),
    run_state_options: run_state_options.to_vec(),
  }
}

fn last_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
  params
    .iter()
    .rev()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.as_str())
}

/// None when the key is absent
fn all_params(params: &[(String, String)], key: &str) -> Option<Vec<String>> {
  let values: Vec<String> = params
    .iter()
    .filter(|(k, _)| k == key)
    .map(|(_, v)| v.clone())
    .collect();
  if values.is_empty() {
    None
  } else {
    Some(values)
  }
}
