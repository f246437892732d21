//! Drift sinks for the watch subsystem.
//!
//! Provides trait-based extensible reporting of watch events: stdout
//! (human-readable difference list) and NDJSON (machine-readable).

use super::config::{AlertFormat, WatchConfig};
use super::state::WatchSummary;
use super::WatchError;
use crate::diff::{DiffSummary, Difference};
use crate::error::NetDriftError;
use crate::inventory::ScanStats;
use crate::model::{Scope, Snapshot};
use crate::reports::DifferencePrinter;
use chrono::{DateTime, Local, Utc};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Result of one successful acquisition+diff cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// 1-based cycle number; the initial scan is cycle 1
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    /// Wall time of acquisition plus diff
    pub duration: Duration,
    pub scope: Scope,
    pub differences: Vec<Difference>,
    pub stats: ScanStats,
}

/// Receiver of watch events.
///
/// Errors returned by a sink are logged by the scheduler and never stop
/// the watch loop.
pub trait DriftSink: Send {
    /// Called once, after the baseline loaded and before the first cycle.
    fn on_baseline_loaded(&mut self, path: &Path, baseline: &Snapshot) -> anyhow::Result<()>;

    /// Called after every successful cycle, with or without differences.
    fn on_cycle(&mut self, report: &CycleReport) -> anyhow::Result<()>;

    /// Called when a cycle's acquisition failed.
    fn on_cycle_failed(&mut self, cycle: u64, error: &NetDriftError) -> anyhow::Result<()>;

    /// Called with a session summary when the loop stops.
    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()>;
}

// ============================================================================
// Stdout sink: human-readable difference list
// ============================================================================

pub struct StdoutAlertSink {
    writer: Box<dyn Write + Send>,
    printer: DifferencePrinter,
    verbose: bool,
    quiet: bool,
}

impl StdoutAlertSink {
    pub fn new(colored: bool, verbose: bool, quiet: bool) -> Self {
        Self::with_writer(Box::new(std::io::stdout()), colored, verbose, quiet)
    }

    pub fn with_writer(
        writer: Box<dyn Write + Send>,
        colored: bool,
        verbose: bool,
        quiet: bool,
    ) -> Self {
        Self {
            writer,
            printer: DifferencePrinter::new(colored, verbose),
            verbose,
            quiet,
        }
    }
}

fn stamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl DriftSink for StdoutAlertSink {
    fn on_baseline_loaded(&mut self, path: &Path, baseline: &Snapshot) -> anyhow::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            self.writer,
            "Loaded baseline state from {} (scope: {}, scanned {})",
            path.display(),
            baseline.scope(),
            baseline.scan_time().format("%Y-%m-%d %H:%M:%S")
        )?;
        Ok(())
    }

    fn on_cycle(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "[{}] Checking for changes...", stamp())?;

        if self.verbose {
            writeln!(
                self.writer,
                "Scan completed in {:?} (region: {})",
                report.duration, report.scope.region
            )?;
            for (collection, stats) in &report.stats.collections {
                writeln!(
                    self.writer,
                    "  Scanned {} {} in {:?}",
                    stats.count, collection, stats.elapsed
                )?;
            }
        }

        self.writer
            .write_all(self.printer.render(&report.differences).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_cycle_failed(&mut self, cycle: u64, error: &NetDriftError) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "[{}] Error scanning infrastructure (cycle {cycle}): {error}",
            stamp()
        )?;
        self.writer.flush()?;
        Ok(())
    }

    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(
            self.writer,
            "[{}] Watch stopped after {} cycle(s) | {} with drift | {} failed | uptime {}s",
            stamp(),
            summary.cycles,
            summary.cycles_with_drift,
            summary.failed_cycles,
            summary.uptime.as_secs(),
        )?;
        if let Some(error) = &summary.last_error {
            writeln!(self.writer, "  Last cycle failed: {error}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

// ============================================================================
// NDJSON sink: one JSON object per event
// ============================================================================

pub struct NdjsonAlertSink {
    writer: Box<dyn Write + Send>,
}

impl NdjsonAlertSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    fn write_event(&mut self, event: &serde_json::Value) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl DriftSink for NdjsonAlertSink {
    fn on_baseline_loaded(&mut self, path: &Path, baseline: &Snapshot) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "baseline",
            "path": path.display().to_string(),
            "timestamp": Utc::now().to_rfc3339(),
            "scope": baseline.scope(),
            "scan_time": baseline.scan_time().to_rfc3339(),
        });
        self.write_event(&event)
    }

    fn on_cycle(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        let summary = DiffSummary::from_differences(&report.differences);
        let event = serde_json::json!({
            "type": "cycle",
            "cycle": report.cycle,
            "timestamp": report.timestamp.to_rfc3339(),
            "duration_ms": report.duration.as_millis() as u64,
            "scope": report.scope,
            "summary": summary,
            "differences": report.differences,
        });
        self.write_event(&event)
    }

    fn on_cycle_failed(&mut self, cycle: u64, error: &NetDriftError) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "cycle_failed",
            "cycle": cycle,
            "timestamp": Utc::now().to_rfc3339(),
            "error": error.to_string(),
        });
        self.write_event(&event)
    }

    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "status",
            "timestamp": Utc::now().to_rfc3339(),
            "cycles": summary.cycles,
            "failed_cycles": summary.failed_cycles,
            "cycles_with_drift": summary.cycles_with_drift,
            "last_difference_count": summary.last_difference_count,
            "status": summary.status,
            "last_cycle_at": summary.last_cycle_at.map(|t| t.to_rfc3339()),
            "last_error": summary.last_error,
            "uptime_secs": summary.uptime.as_secs(),
        });
        self.write_event(&event)
    }
}

// ============================================================================
// Sink builder
// ============================================================================

/// Build drift sinks from the watch configuration.
pub fn build_alert_sinks(config: &WatchConfig) -> Result<Vec<Box<dyn DriftSink>>, WatchError> {
    let mut sinks: Vec<Box<dyn DriftSink>> = Vec::new();

    match config.alert_format {
        AlertFormat::Json => {
            let writer: Box<dyn Write + Send> = match &config.alert_file {
                Some(path) => {
                    let file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)
                        .map_err(|e| WatchError::Sink(format!("{}: {e}", path.display())))?;
                    Box::new(file)
                }
                None => Box::new(std::io::stdout()),
            };
            sinks.push(Box::new(NdjsonAlertSink::new(writer)));
        }
        AlertFormat::Summary => {
            sinks.push(Box::new(StdoutAlertSink::new(
                !config.no_color,
                config.verbose,
                config.quiet,
            )));
        }
    }

    Ok(sinks)
}
