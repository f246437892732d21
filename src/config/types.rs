//! Configuration types for netdrift operations.
//!
//! Provides structured configuration for scan, watch and diff operations.

use crate::reports::ReportFormat;
use crate::watch::AlertFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// This is the top-level configuration struct that aggregates all configuration
/// options. It can be constructed from CLI arguments, config files, or both
/// (with CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Inventory acquisition and rendering
    pub scan: ScanConfig,
    /// Continuous drift monitoring
    pub watch: WatchSettings,
    /// Comparison options shared by `diff` and `watch`
    pub diff: DiffSettings,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for `AppConfig`, used to turn CLI flags into an override layer.
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the scan region.
    #[must_use]
    pub fn region(mut self, region: Option<String>) -> Self {
        self.config.scan.region = region;
        self
    }

    /// Restrict scans to one VPC.
    #[must_use]
    pub fn vpc_id(mut self, vpc_id: Option<String>) -> Self {
        self.config.scan.vpc_id = vpc_id;
        self
    }

    /// Set the inventory document path.
    #[must_use]
    pub fn inventory(mut self, path: Option<PathBuf>) -> Self {
        self.config.scan.inventory = path;
        self
    }

    /// Set the snapshot output format.
    #[must_use]
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.scan.output = format;
        self
    }

    /// Set the baseline path for watch mode.
    #[must_use]
    pub fn baseline(mut self, path: PathBuf) -> Self {
        self.config.watch.baseline = path;
        self
    }

    /// Set the polling interval (e.g. "30s").
    #[must_use]
    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.config.watch.interval = interval.into();
        self
    }

    /// Stop watching after the first drift.
    #[must_use]
    pub const fn exit_on_change(mut self, exit: bool) -> Self {
        self.config.watch.exit_on_change = exit;
        self
    }

    /// Set the watch alert format.
    #[must_use]
    pub const fn alert_format(mut self, format: AlertFormat) -> Self {
        self.config.watch.alert_format = format;
        self
    }

    /// Append watch events to a file.
    #[must_use]
    pub fn alert_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.watch.alert_file = path;
        self
    }

    /// Set verbose output.
    #[must_use]
    pub const fn verbose(mut self, verbose: bool) -> Self {
        self.config.behavior.verbose = verbose;
        self
    }

    /// Set quiet mode.
    #[must_use]
    pub const fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    /// Disable colored output.
    #[must_use]
    pub const fn no_color(mut self, no_color: bool) -> Self {
        self.config.behavior.no_color = no_color;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Scan settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScanConfig {
    /// Cloud region to scan. Falls back to `AWS_REGION`, then `us-east-1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Restrict the scan to a single VPC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    /// JSON inventory document the file provider reads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<PathBuf>,
    /// Output format for `scan`: text, dot, json
    pub output: ReportFormat,
}

/// Watch-mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WatchSettings {
    /// Baseline snapshot compared against on every cycle
    pub baseline: PathBuf,
    /// Polling interval, e.g. 500ms, 30s, 5m, 1h
    pub interval: String,
    /// Stop after the first cycle reporting differences
    pub exit_on_change: bool,
    /// Alert format: summary or json
    pub alert_format: AlertFormat,
    /// Append NDJSON alerts to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_file: Option<PathBuf>,
}

/// Diff settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DiffSettings {
    /// Field names skipped during comparison in addition to the volatile
    /// timestamps (`scan_time`, `create_date`, `update_date`)
    pub ignore_fields: Vec<String>,
}

/// Behavior flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Show scan timing and field-level details
    pub verbose: bool,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Disable colored output
    pub no_color: bool,
}
