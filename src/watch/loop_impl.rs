//! Main watch loop orchestrator.
//!
//! Coordinates baseline loading, periodic acquisition, diffing and sink
//! delivery.

use super::alerts::{build_alert_sinks, CycleReport, DriftSink};
use super::config::{WatchConfig, MAX_INTERVAL};
use super::state::{WatchState, WatchSummary};
use super::WatchError;
use crate::diff::DiffEngine;
use crate::inventory::{acquire_snapshot, InventoryProvider};
use crate::model::Snapshot;
use crate::storage::load_snapshot;
use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Periodic drift check against a fixed baseline.
///
/// `Idle → initial cycle → (wait for tick → cycle)* → stopped`. The baseline
/// is loaded once and never replaced during a run. Cancellation is observed
/// between cycles only; a cycle in flight runs to completion.
pub struct WatchScheduler {
    config: WatchConfig,
    provider: Box<dyn InventoryProvider>,
    engine: DiffEngine,
    sinks: Vec<Box<dyn DriftSink>>,
}

impl WatchScheduler {
    pub fn new(config: WatchConfig, provider: impl InventoryProvider + 'static) -> Self {
        let engine = DiffEngine::new().with_ignored_fields(config.ignore_fields.iter().cloned());
        Self {
            config,
            provider: Box::new(provider),
            engine,
            sinks: Vec::new(),
        }
    }

    /// Add a sink receiving every watch event
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn DriftSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Replace the diff engine, e.g. to change the ignore set
    /// Run until `shutdown` turns true (or its sender is dropped).
    ///
    /// Fails before any scan when the interval is zero or too long, or the
    /// baseline cannot be loaded. Per-cycle acquisition failures are reported to the
    /// sinks and the loop carries on.
    pub async fn run(
        mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<WatchSummary, WatchError> {
        if self.config.interval.is_zero() {
            return Err(WatchError::ZeroInterval);
        }
        if self.config.interval > MAX_INTERVAL {
            return Err(invalid_interval(self.config.interval));
        }

        let path = self.config.baseline_path.clone();
        let baseline =
            load_snapshot(&path).map_err(|source| WatchError::BaselineUnavailable {
                path: path.clone(),
                source,
            })?;
        self.emit(|sink| sink.on_baseline_loaded(&path, &baseline));

        tracing::info!(
            baseline = %path.display(),
            scope = %self.config.scope,
            interval = ?self.config.interval,
            provider = self.provider.name(),
            "watch started"
        );

        let mut state = WatchState::new();

        if *shutdown.borrow() {
            return Ok(self.finish(&state));
        }

        // --- initial scan ---
        let drifted = self.run_cycle(&baseline, &mut state).await;
        if drifted && self.config.exit_on_change {
            tracing::info!("change detected, exiting (exit-on-change)");
            return Ok(self.finish(&state));
        }

        let period = self.config.interval;
        let first_tick = Instant::now()
            .checked_add(period)
            .ok_or_else(|| invalid_interval(period))?;
        let mut ticker = interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // --- main loop ---
        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("shutting down gracefully");
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let drifted = self.run_cycle(&baseline, &mut state).await;
            if drifted && self.config.exit_on_change {
                tracing::info!("change detected, exiting (exit-on-change)");
                break;
            }
        }

        Ok(self.finish(&state))
    }

    /// One acquisition+diff cycle. Returns whether differences were found.
    async fn run_cycle(&mut self, baseline: &Snapshot, state: &mut WatchState) -> bool {
        let cycle = state.begin_cycle();
        let timestamp = Utc::now();
        let started = Instant::now();

        tracing::debug!(cycle, "starting cycle");

        match acquire_snapshot(self.provider.as_ref(), &self.config.scope).await {
            Ok((current, stats)) => {
                let differences = self.engine.compare(baseline, &current);
                let report = CycleReport {
                    cycle,
                    timestamp,
                    duration: started.elapsed(),
                    scope: self.config.scope.clone(),
                    differences,
                    stats,
                };
                state.record_success(report.differences.len());

                tracing::debug!(
                    cycle,
                    differences = report.differences.len(),
                    duration = ?report.duration,
                    "cycle complete"
                );
                self.emit(|sink| sink.on_cycle(&report));
                !report.differences.is_empty()
            }
            Err(e) => {
                tracing::warn!(cycle, error = %e, "cycle failed, will retry on next tick");
                state.record_failure(e.to_string());
                self.emit(|sink| sink.on_cycle_failed(cycle, &e));
                false
            }
        }
    }

    fn finish(&mut self, state: &WatchState) -> WatchSummary {
        let summary = state.summary();
        self.emit(|sink| sink.on_status(&summary));
        tracing::info!(
            cycles = summary.cycles,
            failed = summary.failed_cycles,
            drifted = summary.cycles_with_drift,
            "watch stopped"
        );
        summary
    }

    /// Deliver an event to every sink; sink failures are logged and ignored.
    fn emit<F>(&mut self, mut deliver: F)
    where
        F: FnMut(&mut dyn DriftSink) -> anyhow::Result<()>,
    {
        for sink in &mut self.sinks {
            if let Err(e) = deliver(sink.as_mut()) {
                tracing::warn!("Drift sink error: {e}");
            }
        }
    }
}

fn invalid_interval(interval: std::time::Duration) -> WatchError {
    WatchError::InvalidInterval(format!("{interval:?}"))
}

/// Run the watch loop until Ctrl-C or SIGTERM.
///
/// Builds the sinks described by `config`, wires process signals to the
/// scheduler's shutdown channel and returns the session summary.
pub async fn run_watch_loop(
    config: WatchConfig,
    provider: impl InventoryProvider + 'static,
) -> Result<WatchSummary, WatchError> {
    let sinks = build_alert_sinks(&config)?;
    let mut scheduler = WatchScheduler::new(config, provider);
    for sink in sinks {
        scheduler = scheduler.with_sink(sink);
    }

    let (tx, rx) = watch::channel(false);
    let signals = tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(true);
    });

    let result = scheduler.run(rx).await;
    signals.abort();
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("cannot listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
