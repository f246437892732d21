//! JSON snapshot reporter.

use super::{ReportError, ReportFormat, SnapshotReporter};
use crate::model::Snapshot;

/// Emits the snapshot in its persisted document form.
#[derive(Debug, Clone, Copy)]
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotReporter for JsonReporter {
    fn render(&self, snapshot: &Snapshot) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        };
        let mut json = json.map_err(|e| ReportError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
