//! Continuous drift monitoring / watch mode.
//!
//! Loads a baseline snapshot once, then periodically re-acquires the
//! current inventory, diffs it against the unchanged baseline and forwards
//! the result through pluggable sinks (stdout, NDJSON). A failed cycle is
//! reported and the next tick still fires; the loop stops on Ctrl-C,
//! SIGTERM or when its shutdown channel flips.

pub mod alerts;
pub(crate) mod config;
pub(crate) mod loop_impl;
pub(crate) mod state;

pub use alerts::{build_alert_sinks, CycleReport, DriftSink, NdjsonAlertSink, StdoutAlertSink};
pub use config::{parse_duration, AlertFormat, WatchConfig, DEFAULT_INTERVAL, MAX_INTERVAL};
pub use loop_impl::{run_watch_loop, WatchScheduler};
pub use state::{CycleStatus, WatchSummary};

use crate::error::NetDriftError;
use std::path::PathBuf;

/// Errors specific to the watch subsystem.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WatchError {
    #[error("invalid interval '{0}': expected format like 30s, 5m, 1h (at most 365d)")]
    InvalidInterval(String),

    #[error("baseline state unavailable at {}: {source}", .path.display())]
    BaselineUnavailable {
        path: PathBuf,
        #[source]
        source: NetDriftError,
    },

    #[error("watch interval must be greater than zero")]
    ZeroInterval,

    #[error("alert sink setup failed: {0}")]
    Sink(String),
}
