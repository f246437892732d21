//! Scan command handler.
//!
//! Acquires one snapshot, optionally persists it as the working state and
//! renders it.

use crate::inventory::{acquire_snapshot, FileInventoryProvider, InventoryProvider};
use crate::model::Scope;
use crate::reports::{create_reporter, ReportFormat};
use crate::storage::{save_snapshot, DEFAULT_STATE_FILE};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// Options for a single scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Inventory document read by the file provider
    pub inventory: PathBuf,
    pub scope: Scope,
    pub output: ReportFormat,
    /// Write the snapshot to this path
    pub export_json: Option<PathBuf>,
    /// Write the snapshot to `working_state.json` unless `export_json` is set
    pub save_state: bool,
    pub verbose: bool,
}

impl ScanOptions {
    /// Where the snapshot is persisted, if anywhere.
    #[must_use]
    pub fn state_path(&self) -> Option<PathBuf> {
        self.export_json
            .clone()
            .or_else(|| self.save_state.then(|| PathBuf::from(DEFAULT_STATE_FILE)))
    }
}

/// Run the scan command against the file inventory provider.
pub async fn run_scan(options: ScanOptions) -> Result<()> {
    let provider = FileInventoryProvider::new(&options.inventory);
    let mut stdout = std::io::stdout();
    run_scan_with(&options, &provider, &mut stdout).await
}

/// Run the scan command with any provider, writing the rendering to `out`.
pub(crate) async fn run_scan_with(
    options: &ScanOptions,
    provider: &dyn InventoryProvider,
    out: &mut dyn Write,
) -> Result<()> {
    if options.verbose {
        tracing::info!(
            "Scanning network infrastructure in region: {}",
            options.scope.region
        );
    }

    let (snapshot, stats) = acquire_snapshot(provider, &options.scope)
        .await
        .context("failed to scan network")?;

    if options.verbose {
        let counts: Vec<String> = stats
            .collections
            .iter()
            .map(|(name, c)| format!("{} {name}", c.count))
            .collect();
        tracing::info!("Found {} in {:?}", counts.join(", "), stats.total);
    }

    if let Some(path) = options.state_path() {
        tracing::debug!("Exporting working state to {}", path.display());
        save_snapshot(&snapshot, &path)
            .with_context(|| format!("failed to write state file {}", path.display()))?;
        tracing::info!("Working state exported to {}", path.display());

        // Exporting alone with the default output skips the rendering.
        if options.output == ReportFormat::Text {
            return Ok(());
        }
    }

    create_reporter(options.output)
        .write_report(&snapshot, out)
        .context("failed to generate visualization")?;
    Ok(())
}
