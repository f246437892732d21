//! CLI handler for the `watch` subcommand.

use crate::inventory::FileInventoryProvider;
use crate::watch::{WatchConfig, WatchError, WatchSummary};
use anyhow::Result;
use std::path::Path;

/// Run the watch command with the given configuration.
///
/// Returns once the loop stops (signal or `exit_on_change`). A missing
/// baseline is reported with a hint before any scan happens.
pub async fn run_watch(config: WatchConfig, inventory: &Path) -> Result<WatchSummary> {
    if config.interval.is_zero() {
        return Err(WatchError::ZeroInterval.into());
    }

    if !config.baseline_path.exists() {
        anyhow::bail!(
            "working state file {} does not exist. Run 'netdrift scan --save-state' first to create a baseline",
            config.baseline_path.display()
        );
    }

    if config.verbose {
        tracing::info!(
            "Starting watch in region {} with interval {:?}",
            config.scope.region,
            config.interval
        );
        tracing::info!(
            "Watching for changes against baseline: {}",
            config.baseline_path.display()
        );
    }

    let provider = FileInventoryProvider::new(inventory);
    Ok(crate::watch::run_watch_loop(config, provider).await?)
}
