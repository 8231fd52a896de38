use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Canonical filter values as owned by the filter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
  pub base_date: DateTime<Utc>,
  pub num_runs: u32,
  /// None = parameter not set
  pub run_type: Option<Vec<String>>,
  pub run_state: Option<Vec<String>>,
  pub run_type_options: Vec<String>,
  pub run_state_options: Vec<String>,
}

/// Source of the current instant
pub trait Clock {
  fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Clock pinned to a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

/// "No filter applied" values, captured once when the dashboard starts
/// and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDefaults {
  base_date: DateTime<Utc>,
  num_runs: u32,
}

impl FilterDefaults {
  pub fn capture(clock: &dyn Clock, num_runs: u32) -> Self {
    Self {
      base_date: clock.now(),
      num_runs,
    }
  }

  pub fn base_date(&self) -> DateTime<Utc> {
    self.base_date
  }

  pub fn num_runs(&self) -> u32 {
    self.num_runs
  }
}

/// Wall-clock format used by the date input
pub const ISO_FORMAT_WITHOUT_TZ: &str = "%Y-%m-%dT%H:%M:%S";

const LOCAL_INPUT_FORMATS: &[&str] = &[
  ISO_FORMAT_WITHOUT_TZ,
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
];

/// Timezone the dashboard displays dates in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayTimezone(FixedOffset);

impl DisplayTimezone {
  pub fn utc() -> Self {
    Self(Utc.fix())
  }

  pub fn offset(&self) -> FixedOffset {
    self.0
  }

  /// Convert an instant to wall-clock time in this timezone
  pub fn localize(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&self.0)
  }

  /// Format an instant for the date input
  pub fn format_local(&self, instant: DateTime<Utc>) -> String {
    self.localize(instant).format(ISO_FORMAT_WITHOUT_TZ).to_string()
  }

  /// Parse user input as wall-clock time in this timezone. Input that
  /// carries its own offset (RFC 3339) is taken as-is.
  pub fn parse_local(&self, input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
      return Some(dt.with_timezone(&Utc));
    }
    LOCAL_INPUT_FORMATS
      .iter()
      .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
      .and_then(|naive| self.0.from_local_datetime(&naive).single())
      .map(|dt| dt.with_timezone(&Utc))
  }

  fn minute_of(&self, instant: DateTime<Utc>) -> (NaiveDate, u32, u32) {
    let local = self.localize(instant);
    (local.date_naive(), local.hour(), local.minute())
  }

  /// Whether both instants fall in the same wall-clock minute
  pub fn same_minute(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    self.minute_of(a) == self.minute_of(b)
  }
}

impl Default for DisplayTimezone {
  fn default() -> Self {
    Self::utc()
  }
}

impl fmt::Display for DisplayTimezone {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.local_minus_utc() == 0 {
      write!(f, "UTC")
    } else {
      write!(f, "{}", self.0)
    }
  }
}

impl FromStr for DisplayTimezone {
  type Err = String;

  /// Accepts "UTC", "Z", "+HH:MM", "-HH:MM" and "+HHMM"
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s == "Z" {
      return Ok(Self::utc());
    }

    let (sign, rest) = match s.chars().next() {
      Some('+') => (1, &s[1..]),
      Some('-') => (-1, &s[1..]),
      _ => return Err(format!("invalid timezone offset: {}", s)),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
      return Err(format!("invalid timezone offset: {}", s));
    }

    let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid hours: {}", s))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid minutes: {}", s))?;
    if minutes >= 60 {
      return Err(format!("invalid minutes: {}", s));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
      .map(Self)
      .ok_or_else(|| format!("timezone offset out of range: {}", s))
  }
}

/// Per-field "is this at its default" flags, derived fresh on every render.
///
/// The run count is a page size rather than a filter and has no flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefaults {
  pub base_date: bool,
  pub run_type: bool,
  pub run_state: bool,
}

impl FieldDefaults {
  pub fn compute(state: &FilterState, defaults: &FilterDefaults, tz: DisplayTimezone) -> Self {
    Self {
      base_date: tz.same_minute(state.base_date, defaults.base_date()),
      run_type: is_tag_filter_default(state.run_type.as_deref()),
      run_state: is_tag_filter_default(state.run_state.as_deref()),
    }
  }

  /// True when no filter is applied at all
  pub fn all(&self) -> bool {
    self.base_date && self.run_type && self.run_state
  }
}

/// Absent and empty both mean "no filter"
pub fn is_tag_filter_default(tags: Option<&[String]>) -> bool {
  tags.map_or(true, |t| t.is_empty())
}
