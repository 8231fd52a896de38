use crate::filters::DisplayTimezone;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// Custom title for header
  pub title: Option<String>,
  /// Display timezone as an offset ("UTC", "+02:00", ...)
  #[serde(default, deserialize_with = "deserialize_timezone")]
  pub timezone: DisplayTimezone,
  /// JSON file with the runs to list
  pub runs_file: Option<PathBuf>,
  #[serde(default)]
  pub filters: FiltersConfig,
  #[serde(default)]
  pub auto_refresh: AutoRefreshConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: None,
      timezone: DisplayTimezone::utc(),
      runs_file: None,
      filters: FiltersConfig::default(),
      auto_refresh: AutoRefreshConfig::default(),
    }
  }
}

/// Choices offered by the filter bar
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
  /// Selectable run counts
  pub num_runs: Vec<u32>,
  pub default_num_runs: u32,
  pub run_types: Vec<String>,
  pub run_states: Vec<String>,
}

impl Default for FiltersConfig {
  fn default() -> Self {
    Self {
      num_runs: vec![5, 25, 50, 100, 365],
      default_num_runs: 25,
      run_types: ["backfill", "scheduled", "manual", "dataset_triggered"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
      run_states: ["queued", "success", "running", "failed"]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
  }
}

/// Periodic reload of the runs file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutoRefreshConfig {
  /// Initial state of the switch
  pub enabled: bool,
  /// Seconds between reloads
  pub interval_secs: u64,
}

impl Default for AutoRefreshConfig {
  fn default() -> Self {
    Self {
      enabled: false,
      interval_secs: 3,
    }
  }
}

fn deserialize_timezone<'de, D>(deserializer: D) -> Result<DisplayTimezone, D::Error>
where
  D: serde::Deserializer<'de>,
{
  let s = String::deserialize(deserializer)?;
  s.parse().map_err(serde::de::Error::custom)
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./runfilter.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/runfilter/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("runfilter.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("runfilter").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.filters.default_num_runs == 0 {
      return Err(eyre!("filters.default_num_runs must be positive"));
    }
    if self.filters.num_runs.iter().any(|n| *n == 0) {
      return Err(eyre!("filters.num_runs must only contain positive counts"));
    }
    if self.auto_refresh.interval_secs == 0 {
      return Err(eyre!("auto_refresh.interval_secs must be positive"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_full_config() {
    let config = Config::parse(
      r#"
title: Nightly ETL
timezone: "+01:00"
runs_file: runs.json
filters:
  num_runs: [10, 20]
  default_num_runs: 10
  run_types: [manual]
  run_states: [success, failed]
auto_refresh:
  enabled: true
  interval_secs: 10
"#,
    )
    .unwrap();

    assert_eq!(config.title.as_deref(), Some("Nightly ETL"));
    assert_eq!(config.timezone.offset().local_minus_utc(), 3600);
    assert_eq!(config.runs_file, Some(PathBuf::from("runs.json")));
    assert_eq!(config.filters.num_runs, vec![10, 20]);
    assert_eq!(config.filters.run_types, vec!["manual"]);
    assert!(config.auto_refresh.enabled);
    assert_eq!(config.auto_refresh.interval_secs, 10);
  }

  #[test]
  fn test_partial_filters_use_defaults() {
    let config = Config::parse("filters:\n  default_num_runs: 50\n").unwrap();
    assert_eq!(config.timezone, DisplayTimezone::utc());
    assert_eq!(config.filters.default_num_runs, 50);
    assert_eq!(config.filters.num_runs, vec![5, 25, 50, 100, 365]);
    assert_eq!(config.filters.run_types.len(), 4);
    assert!(!config.auto_refresh.enabled);
    assert_eq!(config.auto_refresh.interval_secs, 3);
  }

  #[test]
  fn test_invalid_timezone_rejected() {
    assert!(Config::parse("timezone: Mars/Olympus\n").is_err());
  }

  #[test]
  fn test_zero_run_count_rejected() {
    assert!(Config::parse("filters:\n  default_num_runs: 0\n").is_err());
    assert!(Config::parse("filters:\n  num_runs: [0, 5]\n").is_err());
  }

  #[test]
  fn test_zero_refresh_interval_rejected() {
    assert!(Config::parse("auto_refresh:\n  interval_secs: 0\n").is_err());
  }
}
