//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod diff;
mod scan;
mod watch;

pub use diff::{run_diff, DiffOptions};
pub use scan::{run_scan, ScanOptions};
pub use watch::run_watch;

/// Process exit codes
pub mod exit_codes {
    /// Success, no drift detected
    pub const SUCCESS: i32 = 0;
    /// Drift was detected (`diff --fail-on-change`)
    pub const CHANGES_DETECTED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 2;
}
