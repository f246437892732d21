//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two saved states offline.

use super::exit_codes;
use crate::diff::{DiffEngine, DiffSummary, Difference};
use crate::reports::DifferencePrinter;
use crate::storage::load_snapshot;
use crate::watch::AlertFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Options for an offline comparison.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub output: AlertFormat,
    /// Exit with [`exit_codes::CHANGES_DETECTED`] when differences are found
    pub fail_on_change: bool,
    pub ignore_fields: Vec<String>,
    pub colored: bool,
    pub verbose: bool,
}

#[derive(Serialize)]
struct DiffDocument<'a> {
    summary: DiffSummary,
    differences: &'a [Difference],
}

/// Run the diff command, returning the desired exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
pub fn run_diff(options: DiffOptions) -> Result<i32> {
    let mut stdout = std::io::stdout().lock();
    run_diff_to(&options, &mut stdout)
}

pub(crate) fn run_diff_to(options: &DiffOptions, out: &mut dyn Write) -> Result<i32> {
    let baseline = load_snapshot(&options.baseline)
        .with_context(|| format!("failed to load baseline {}", options.baseline.display()))?;
    let current = load_snapshot(&options.current)
        .with_context(|| format!("failed to load {}", options.current.display()))?;

    tracing::debug!(
        baseline = baseline.content_hash(),
        current = current.content_hash(),
        "comparing snapshots"
    );

    let engine = DiffEngine::new().with_ignored_fields(options.ignore_fields.iter().cloned());
    let (differences, summary) = engine.compare_summary(&baseline, &current);

    match options.output {
        AlertFormat::Summary => {
            DifferencePrinter::new(options.colored, options.verbose).write(&differences, out)?;
        }
        AlertFormat::Json => {
            let doc = DiffDocument {
                summary: summary.clone(),
                differences: &differences,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)
                .context("failed to serialize differences")?;
            writeln!(out)?;
        }
    }

    Ok(determine_exit_code(options, &summary))
}

/// Determine the appropriate exit code based on diff results and flags.
const fn determine_exit_code(options: &DiffOptions, summary: &DiffSummary) -> i32 {
    if options.fail_on_change && summary.total > 0 {
        return exit_codes::CHANGES_DETECTED;
    }
    exit_codes::SUCCESS
}
