//! Watch configuration and duration parsing.

use super::WatchError;
use crate::model::Scope;
use crate::storage::DEFAULT_STATE_FILE;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Polling interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Longest accepted polling interval (one year).
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 86_400);

/// How drift events are emitted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AlertFormat {
    /// Human-readable difference list
    #[default]
    Summary,
    /// One JSON object per event
    Json,
}

impl std::fmt::Display for AlertFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "summary"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Configuration for the watch command.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Persisted baseline snapshot compared against on every cycle
    pub baseline_path: PathBuf,
    /// Time between the end of one cycle's tick and the next
    pub interval: Duration,
    /// Region and optional VPC filter, fixed for the whole session
    pub scope: Scope,
    /// Print scan timing, per-collection counts and field details
    pub verbose: bool,
    /// Suppress non-essential output
    pub quiet: bool,
    pub no_color: bool,
    /// Stop after the first cycle that reports differences (CI mode)
    pub exit_on_change: bool,
    pub alert_format: AlertFormat,
    /// Append NDJSON events to this file instead of stdout
    pub alert_file: Option<PathBuf>,
    /// Extra field names skipped by the diff engine
    pub ignore_fields: Vec<String>,
}

impl WatchConfig {
    /// Defaults for a scope: `working_state.json`, 30s, summary output.
    pub fn new(scope: Scope) -> Self {
        Self {
            baseline_path: PathBuf::from(DEFAULT_STATE_FILE),
            interval: DEFAULT_INTERVAL,
            scope,
            verbose: false,
            quiet: false,
            no_color: false,
            exit_on_change: false,
            alert_format: AlertFormat::Summary,
            alert_file: None,
            ignore_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_baseline(mut self, path: impl Into<PathBuf>) -> Self {
        self.baseline_path = path.into();
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Parse a human-readable duration string into a [`Duration`].
///
/// Supported suffixes: `ms` (milliseconds), `s` (seconds), `m` (minutes),
/// `h` (hours), `d` (days). Values above [`MAX_INTERVAL`] are rejected.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
/// assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, WatchError> {
    let s = s.trim();
    let invalid = || WatchError::InvalidInterval(s.to_string());

    let (num_str, unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, "ms")
    } else if let Some(last) = s.chars().last().filter(|c| matches!(c, 's' | 'm' | 'h' | 'd')) {
        (&s[..s.len() - 1], &s[s.len() - last.len_utf8()..])
    } else {
        return Err(invalid());
    };

    let value: u64 = num_str.parse().map_err(|_| invalid())?;

    let secs = |factor: u64| {
        value
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(invalid)
    };

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "s" => secs(1)?,
        "m" => secs(60)?,
        "h" => secs(3600)?,
        "d" => secs(86_400)?,
        _ => return Err(invalid()),
    };

    if duration > MAX_INTERVAL {
        return Err(invalid());
    }
    Ok(duration)
}
