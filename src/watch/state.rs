//! Watch session state.
//!
//! Counters for the cycles run against the baseline and the outcome of the
//! most recent one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of the most recent cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    /// No cycle has completed yet
    Pending,
    /// Current state matches the baseline
    Clean,
    /// Current state differs from the baseline
    Drifted,
    /// Acquisition failed
    Error,
}

impl std::fmt::Display for CycleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "WAIT"),
            Self::Clean => write!(f, "OK"),
            Self::Drifted => write!(f, "DRIFT"),
            Self::Error => write!(f, "ERR"),
        }
    }
}

/// Mutable state of an active watch session.
#[derive(Debug)]
pub(crate) struct WatchState {
    pub started_at: Instant,
    /// Cycles started, including failed ones
    pub cycles: u64,
    pub failed_cycles: u64,
    pub cycles_with_drift: u64,
    pub last_difference_count: Option<usize>,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub status: CycleStatus,
}

impl WatchState {
    pub(crate) fn new() -> Self {
        Self {
            started_at: Instant::now(),
            cycles: 0,
            failed_cycles: 0,
            cycles_with_drift: 0,
            last_difference_count: None,
            last_cycle_at: None,
            last_error: None,
            status: CycleStatus::Pending,
        }
    }

    /// Start a new cycle and return its 1-based number.
    pub(crate) fn begin_cycle(&mut self) -> u64 {
        self.cycles += 1;
        self.last_cycle_at = Some(Utc::now());
        self.cycles
    }

    pub(crate) fn record_success(&mut self, differences: usize) {
        self.last_difference_count = Some(differences);
        self.last_error = None;
        if differences > 0 {
            self.cycles_with_drift += 1;
            self.status = CycleStatus::Drifted;
        } else {
            self.status = CycleStatus::Clean;
        }
    }

    pub(crate) fn record_failure(&mut self, error: String) {
        self.failed_cycles += 1;
        self.last_error = Some(error);
        self.status = CycleStatus::Error;
    }

    pub(crate) fn summary(&self) -> WatchSummary {
        WatchSummary {
            cycles: self.cycles,
            failed_cycles: self.failed_cycles,
            cycles_with_drift: self.cycles_with_drift,
            last_difference_count: self.last_difference_count,
            status: self.status,
            last_cycle_at: self.last_cycle_at,
            last_error: self.last_error.clone(),
            uptime: self.started_at.elapsed(),
        }
    }
}

/// Summary of a watch session, passed to sinks and returned by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchSummary {
    pub cycles: u64,
    pub failed_cycles: u64,
    pub cycles_with_drift: u64,
    /// Differences found by the last successful cycle
    pub last_difference_count: Option<usize>,
    pub status: CycleStatus,
    /// Wall-clock start of the most recent cycle
    pub last_cycle_at: Option<DateTime<Utc>>,
    /// Error of the most recent cycle, cleared by the next success
    pub last_error: Option<String>,
    pub uptime: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_new() {
        let state = WatchState::new();
        assert_eq!(state.cycles, 0);
        assert_eq!(state.status, CycleStatus::Pending);
        assert!(state.last_difference_count.is_none());
    }

    #[test]
    fn test_state_counts_outcomes() {
        let mut state = WatchState::new();

        assert_eq!(state.begin_cycle(), 1);
        state.record_success(0);
        assert_eq!(state.status, CycleStatus::Clean);

        assert_eq!(state.begin_cycle(), 2);
        state.record_failure("throttled".to_string());
        assert_eq!(state.status, CycleStatus::Error);

        assert_eq!(state.begin_cycle(), 3);
        state.record_success(4);

        let summary = state.summary();
        assert_eq!(summary.cycles, 3);
        assert_eq!(summary.failed_cycles, 1);
        assert_eq!(summary.cycles_with_drift, 1);
        assert_eq!(summary.last_difference_count, Some(4));
        assert_eq!(summary.status, CycleStatus::Drifted);
        assert!(summary.last_error.is_none());
        assert!(summary.last_cycle_at.is_some());
    }

    #[test]
    fn test_summary_reports_last_failure() {
        let mut state = WatchState::new();
        assert!(state.summary().last_cycle_at.is_none());

        state.begin_cycle();
        state.record_failure("listing vpcs: throttled".to_string());

        let summary = state.summary();
        assert_eq!(summary.status, CycleStatus::Error);
        assert_eq!(summary.last_error.as_deref(), Some("listing vpcs: throttled"));
        assert!(summary.last_cycle_at.is_some());
    }

    #[test]
    fn test_cycle_status_display() {
        assert_eq!(CycleStatus::Clean.to_string(), "OK");
        assert_eq!(CycleStatus::Drifted.to_string(), "DRIFT");
        assert_eq!(CycleStatus::Error.to_string(), "ERR");
    }
}
