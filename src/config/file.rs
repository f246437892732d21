//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::DEFAULT_WATCH_INTERVAL;
use super::types::AppConfig;
use crate::reports::ReportFormat;
use crate::storage::DEFAULT_STATE_FILE;
use crate::watch::AlertFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for, in order of preference.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".netdrift.yaml",
    ".netdrift.yml",
    "netdrift.yaml",
    "netdrift.yml",
    ".netdriftrc",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. The directories of [`config_search_dirs`]
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    config_search_dirs()
        .into_iter()
        .find_map(|dir| find_config_in_dir(&dir))
}

/// Directories searched for a config file, in order:
/// 1. Current directory
/// 2. Git repository root (if in a repo)
/// 3. User config directory (~/.config/netdrift/)
/// 4. Home directory
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    let cwd = std::env::current_dir().ok();
    search_dirs_from(
        cwd.as_deref(),
        dirs::config_dir().map(|d| d.join("netdrift")),
        dirs::home_dir(),
    )
}

fn search_dirs_from(
    cwd: Option<&Path>,
    config_dir: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let git_root = cwd.and_then(find_git_root);
    let candidates = [cwd.map(Path::to_path_buf), git_root, config_dir, home];

    let mut searched: Vec<PathBuf> = Vec::new();
    for dir in candidates.into_iter().flatten() {
        if !searched.contains(&dir) {
            searched.push(dir);
        }
    }
    searched
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up from `start`.
fn find_git_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    // An empty file is a valid, all-default config.
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml_ng::from_str(&content)?)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so a CLI layer
    /// built from unset flags leaves the file config untouched.
    pub fn merge(&mut self, other: &Self) {
        if other.scan.region.is_some() {
            self.scan.region.clone_from(&other.scan.region);
        }
        if other.scan.vpc_id.is_some() {
            self.scan.vpc_id.clone_from(&other.scan.vpc_id);
        }
        if other.scan.inventory.is_some() {
            self.scan.inventory.clone_from(&other.scan.inventory);
        }
        if other.scan.output != ReportFormat::default() {
            self.scan.output = other.scan.output;
        }

        if other.watch.baseline != Path::new(DEFAULT_STATE_FILE) {
            self.watch.baseline.clone_from(&other.watch.baseline);
        }
        if other.watch.interval != DEFAULT_WATCH_INTERVAL {
            self.watch.interval.clone_from(&other.watch.interval);
        }
        if other.watch.exit_on_change {
            self.watch.exit_on_change = true;
        }
        if other.watch.alert_format != AlertFormat::default() {
            self.watch.alert_format = other.watch.alert_format;
        }
        if other.watch.alert_file.is_some() {
            self.watch.alert_file.clone_from(&other.watch.alert_file);
        }

        for field in &other.diff.ignore_fields {
            if !self.diff.ignore_fields.contains(field) {
                self.diff.ignore_fields.push(field.clone());
            }
        }

        if other.behavior.verbose {
            self.behavior.verbose = true;
        }
        if other.behavior.quiet {
            self.behavior.quiet = true;
        }
        if other.behavior.no_color {
            self.behavior.no_color = true;
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate a commented example config file.
#[must_use]
pub fn generate_example_config() -> String {
    r"# netdrift configuration file
# ============================
#
# Place it at:
#   - .netdrift.yaml in your project root
#   - ~/.config/netdrift/netdrift.yaml for global config
#
# CLI arguments always override file settings.

scan:
  # Region to scan; falls back to AWS_REGION, then us-east-1
  # region: us-east-1
  # Restrict the scan to a single VPC
  # vpc_id: vpc-0123456789abcdef0
  # Inventory document read by the file provider
  # inventory: ./inventory.json
  # Output format: text, dot, json
  output: text

watch:
  # Baseline written by `netdrift scan --save-state`
  baseline: working_state.json
  # Polling interval: 500ms, 30s, 5m, 1h, 1d
  interval: 30s
  # Stop after the first cycle that finds differences
  exit_on_change: false
  # Alert format: summary, json
  alert_format: summary
  # Append NDJSON alerts to a file instead of stdout
  # alert_file: ./drift.ndjson

diff:
  # Field names ignored in addition to scan_time, create_date, update_date
  ignore_fields: []

behavior:
  verbose: false
  quiet: false
  no_color: false
"
    .to_string()
}
