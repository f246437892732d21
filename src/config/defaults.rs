//! Default values for netdrift configuration.

use super::types::WatchSettings;
use crate::storage::DEFAULT_STATE_FILE;
use crate::watch::AlertFormat;
use std::path::PathBuf;

/// Region used when neither the CLI, the config file nor `AWS_REGION` names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default watch interval, as written in config files.
pub const DEFAULT_WATCH_INTERVAL: &str = "30s";

/// Environment variable consulted for the region.
pub const REGION_ENV_VAR: &str = "AWS_REGION";

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from(DEFAULT_STATE_FILE),
            interval: DEFAULT_WATCH_INTERVAL.to_string(),
            exit_on_change: false,
            alert_format: AlertFormat::Summary,
            alert_file: None,
        }
    }
}

/// Resolve the scan region: CLI flag, then config file, then environment,
/// then [`DEFAULT_REGION`]. Empty values are skipped at every step.
#[must_use]
pub fn resolve_region(cli: Option<&str>, config: Option<&str>) -> String {
    resolve_region_with(cli, config, std::env::var(REGION_ENV_VAR).ok().as_deref())
}

pub(crate) fn resolve_region_with(
    cli: Option<&str>,
    config: Option<&str>,
    env: Option<&str>,
) -> String {
    [cli, config, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REGION)
        .to_string()
}
