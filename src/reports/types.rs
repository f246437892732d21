//! Report configuration types.

use super::ReportError;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for snapshot reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Indented tree for the terminal
    #[default]
    Text,
    /// Graphviz DOT graph
    Dot,
    /// The persisted snapshot document
    Json,
}

impl ReportFormat {
    /// Parse a format name, case-insensitively.
    pub fn parse(s: &str) -> Result<Self, ReportError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "dot" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Dot => write!(f, "dot"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}
