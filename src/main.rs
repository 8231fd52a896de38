mod app;
mod config;
mod event;
mod filters;
mod runs;
mod ui;

use chrono::{DateTime, Utc};
use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "runfilter")]
#[command(about = "A terminal dashboard for filtering pipeline runs")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/runfilter/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// JSON file with runs to list (overrides runs_file from config)
  #[arg(short, long)]
  runs: Option<PathBuf>,

  /// Display timezone offset, e.g. "UTC" or "+02:00"
  #[arg(short, long)]
  timezone: Option<String>,

  /// Initial filters as a query string, e.g. "run_type=manual&num_runs=50"
  #[arg(short, long, default_value = "")]
  query: String,

  /// Pin the session start (RFC 3339) instead of using the current time
  #[arg(long)]
  now: Option<String>,
}

/// Log to a file under the data dir; the terminal belongs to the UI.
/// Level comes from RUNFILTER_LOG (default "info").
fn init_logging() -> Option<WorkerGuard> {
  let log_dir = dirs::data_dir()?.join("runfilter");
  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, "runfilter.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter =
    EnvFilter::try_from_env("RUNFILTER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  let _log_guard = init_logging();

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(tz) = args.timezone {
    config.timezone = tz
      .parse()
      .map_err(|e| eyre!("Invalid --timezone: {}", e))?;
  }
  if let Some(path) = args.runs {
    config.runs_file = Some(path);
  }

  let runs = app::App::load_runs(&config)?;

  let clock: Box<dyn filters::Clock> = match args.now {
    Some(now) => {
      let now = DateTime::parse_from_rfc3339(&now)
        .map_err(|e| eyre!("Invalid --now {}: {}", now, e))?;
      Box::new(filters::FixedClock(now.with_timezone(&Utc)))
    }
    None => Box::new(filters::SystemClock),
  };

  let mut app = app::App::new(config, runs, &args.query, clock.as_ref());
  app.run().await?;

  Ok(())
}
