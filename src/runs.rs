use crate::filters::FilterState;
use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::Path;

/// A single pipeline run as listed in the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DagRun {
  pub run_id: String,
  pub run_type: String,
  pub state: String,
  pub execution_date: DateTime<Utc>,
}

/// Load runs from a JSON array on disk
pub fn load_runs(path: &Path) -> Result<Vec<DagRun>> {
  let contents = std::fs::read_to_string(path)
    .map_err(|e| eyre!("Failed to read runs file {}: {}", path.display(), e))?;

  let runs: Vec<DagRun> = serde_json::from_str(&contents)
    .map_err(|e| eyre!("Failed to parse runs file {}: {}", path.display(), e))?;

  Ok(runs)
}

fn matches_tags(tags: Option<&[String]>, value: &str) -> bool {
  match tags {
    None | Some([]) => true,
    Some(tags) => tags.iter().any(|t| t == value),
  }
}

/// Runs the current filters select: at or before the base date, matching
/// the run-type and run-state sets when set, newest first, capped at
/// `num_runs`.
pub fn visible_runs<'a>(runs: &'a [DagRun], filters: &FilterState) -> Vec<&'a DagRun> {
  let mut visible: Vec<&DagRun> = runs
    .iter()
    .filter(|run| run.execution_date <= filters.base_date)
    .filter(|run| matches_tags(filters.run_type.as_deref(), &run.run_type))
    .filter(|run| matches_tags(filters.run_state.as_deref(), &run.state))
    .collect();

  visible.sort_by(|a, b| b.execution_date.cmp(&a.execution_date));
  visible.truncate(filters.num_runs as usize);
  visible
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn run(id: &str, run_type: &str, state: &str, hour: u32) -> DagRun {
    DagRun {
      run_id: id.to_string(),
      run_type: run_type.to_string(),
      state: state.to_string(),
      execution_date: Utc.with_ymd_and_hms(2024, 3, 10, hour, 0, 0).unwrap(),
    }
  }

  fn test_runs() -> Vec<DagRun> {
    vec![
      run("scheduled__01", "scheduled", "success", 1),
      run("manual__02", "manual", "failed", 2),
      run("backfill__03", "backfill", "success", 3),
      run("scheduled__04", "scheduled", "running", 4),
    ]
  }

  fn filters() -> FilterState {
    FilterState {
      base_date: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
      num_runs: 25,
      run_type: None,
      run_state: None,
      run_type_options: Vec::new(),
      run_state_options: Vec::new(),
    }
  }

  fn ids(runs: Vec<&DagRun>) -> Vec<&str> {
    runs.iter().map(|r| r.run_id.as_str()).collect()
  }

  #[test]
  fn test_no_filters_newest_first() {
    let runs = test_runs();
    assert_eq!(
      ids(visible_runs(&runs, &filters())),
      vec!["scheduled__04", "backfill__03", "manual__02", "scheduled__01"]
    );
  }

  #[test]
  fn test_base_date_and_limit() {
    let runs = test_runs();
    let mut f = filters();
    f.base_date = Utc.with_ymd_and_hms(2024, 3, 10, 3, 0, 0).unwrap();
    f.num_runs = 2;
    assert_eq!(
      ids(visible_runs(&runs, &f)),
      vec!["backfill__03", "manual__02"]
    );
  }

  #[test]
  fn test_tag_filters() {
    let runs = test_runs();
    let mut f = filters();
    f.run_type = Some(vec!["scheduled".to_string()]);
    f.run_state = Some(vec!["success".to_string(), "failed".to_string()]);
    assert_eq!(ids(visible_runs(&runs, &f)), vec!["scheduled__01"]);

    f.run_type = Some(Vec::new());
    assert_eq!(
      ids(visible_runs(&runs, &f)),
      vec!["backfill__03", "manual__02", "scheduled__01"]
    );
  }

  #[test]
  fn test_parse_runs_json() {
    let json = r#"[{"run_id":"manual__1","run_type":"manual","state":"queued","execution_date":"2024-03-10T08:00:00Z"}]"#;
    let runs: Vec<DagRun> = serde_json::from_str(json).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].run_type, "manual");
  }
}
