//! Report generation for snapshots and difference lists.
//!
//! This module provides the output formats of the tool:
//! - Text: indented tree of each VPC and its resources
//! - Dot: Graphviz graph of the topology
//! - JSON: the persisted snapshot document
//!
//! Difference lists are printed by [`DifferencePrinter`], shared by the
//! `diff` command and the watch stdout sink.

mod differences;
mod dot;
pub mod escape;
mod json;
mod text;
mod types;

pub use differences::DifferencePrinter;
pub use dot::DotReporter;
pub use json::JsonReporter;
pub use text::TextTreeReporter;
pub use types::ReportFormat;

use crate::model::Snapshot;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for snapshot renderers
pub trait SnapshotReporter {
    /// Render a snapshot to a string
    fn render(&self, snapshot: &Snapshot) -> Result<String, ReportError>;

    /// Write a rendered snapshot to a writer
    fn write_report(&self, snapshot: &Snapshot, writer: &mut dyn Write) -> Result<(), ReportError> {
        let report = self.render(snapshot)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this reporter produces
    fn format(&self) -> ReportFormat;
}

/// Create the reporter for a format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn SnapshotReporter> {
    match format {
        ReportFormat::Text => Box::new(TextTreeReporter::new()),
        ReportFormat::Dot => Box::new(DotReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}

/// Wrap text in an ANSI color sequence when `colored` is set.
pub(crate) fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}
