//! Integration tests for the watch scheduler.

use async_trait::async_trait;
use chrono::Utc;
use netdrift::error::{InventoryErrorKind, NetDriftError};
use netdrift::inventory::{InMemoryInventory, InventoryProvider};
use netdrift::model::{RawInventory, Scope, Snapshot, Subnet, Vpc};
use netdrift::watch::{
    parse_duration, CycleReport, CycleStatus, DriftSink, NdjsonAlertSink, WatchConfig,
    WatchError, WatchScheduler, WatchSummary,
};
use netdrift::save_snapshot;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;
use tokio::time::Instant;

// ============================================================================
// Helpers
// ============================================================================

fn vpc(id: &str) -> Vpc {
    Vpc {
        id: id.to_string(),
        cidr_block: "10.0.0.0/16".to_string(),
        ..Vpc::default()
    }
}

fn baseline_inventory() -> RawInventory {
    RawInventory {
        vpcs: vec![vpc("vpc-1")],
        subnets: vec![Subnet {
            id: "subnet-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..Subnet::default()
        }],
        ..RawInventory::default()
    }
}

fn drifted_inventory() -> RawInventory {
    let mut raw = baseline_inventory();
    raw.vpcs.push(vpc("vpc-2"));
    raw
}

fn write_baseline(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("working_state.json");
    let snapshot =
        Snapshot::build(baseline_inventory(), Scope::new("us-east-1"), Utc::now()).unwrap();
    save_snapshot(&snapshot, &path).unwrap();
    path
}

fn config(baseline: &Path, interval: Duration) -> WatchConfig {
    WatchConfig::new(Scope::new("us-east-1"))
        .with_baseline(baseline)
        .with_interval(interval)
}

/// Serves a fixed inventory, failing acquisition on the listed call numbers.
struct FlakyProvider {
    inner: InMemoryInventory,
    calls: AtomicUsize,
    fail_on: Vec<usize>,
}

impl FlakyProvider {
    fn new(raw: RawInventory, fail_on: Vec<usize>) -> Self {
        Self {
            inner: InMemoryInventory::new(raw),
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl InventoryProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn list_vpcs(&self, scope: &Scope) -> netdrift::Result<Vec<Vpc>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(NetDriftError::inventory(
                "listing vpcs",
                InventoryErrorKind::Throttled("rate exceeded".to_string()),
            ));
        }
        self.inner.list_vpcs(scope).await
    }

    async fn list_subnets(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> netdrift::Result<Vec<Subnet>> {
        self.inner.list_subnets(scope, vpc_ids).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Baseline,
    Cycle { cycle: u64, differences: usize },
    Failed { cycle: u64 },
    Status,
}

/// Records events and optionally requests shutdown after a given cycle.
#[derive(Clone)]
struct RecordingSink {
    events: Arc<Mutex<Vec<(Instant, Event)>>>,
    stop_after: Option<(u64, Arc<watch::Sender<bool>>)>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            events: Arc::default(),
            stop_after: None,
        }
    }

    fn stopping_after(cycle: u64, tx: watch::Sender<bool>) -> Self {
        Self {
            events: Arc::default(),
            stop_after: Some((cycle, Arc::new(tx))),
        }
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }

    fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    fn maybe_stop(&self, cycle: u64) {
        if let Some((after, tx)) = &self.stop_after {
            if cycle >= *after {
                let _ = tx.send(true);
            }
        }
    }
}

impl DriftSink for RecordingSink {
    fn on_baseline_loaded(&mut self, _path: &Path, _baseline: &Snapshot) -> anyhow::Result<()> {
        self.record(Event::Baseline);
        Ok(())
    }

    fn on_cycle(&mut self, report: &CycleReport) -> anyhow::Result<()> {
        self.record(Event::Cycle {
            cycle: report.cycle,
            differences: report.differences.len(),
        });
        self.maybe_stop(report.cycle);
        Ok(())
    }

    fn on_cycle_failed(&mut self, cycle: u64, _error: &NetDriftError) -> anyhow::Result<()> {
        self.record(Event::Failed { cycle });
        self.maybe_stop(cycle);
        Ok(())
    }

    fn on_status(&mut self, _summary: &WatchSummary) -> anyhow::Result<()> {
        self.record(Event::Status);
        Ok(())
    }
}

/// Writer shared with the test so NDJSON output can be inspected.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// Interval parsing
// ============================================================================

#[test]
fn test_parse_duration_accepts_units() {
    assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
    assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
}

#[test]
fn test_parse_duration_rejects_bare_number() {
    assert!(matches!(
        parse_duration("30"),
        Err(WatchError::InvalidInterval(_))
    ));
}

// ============================================================================
// Startup failures
// ============================================================================

#[tokio::test]
async fn test_missing_baseline_fails_before_any_scan() {
    let dir = TempDir::new().unwrap();
    let provider = FlakyProvider::new(baseline_inventory(), vec![]);
    let sink = RecordingSink::new();
    let (_tx, rx) = watch::channel(false);

    let scheduler = WatchScheduler::new(
        config(&dir.path().join("missing.json"), Duration::from_secs(30)),
        provider,
    )
    .with_sink(Box::new(sink.clone()));

    let err = scheduler.run(rx).await.unwrap_err();
    match err {
        WatchError::BaselineUnavailable { source, .. } => assert!(source.is_not_found()),
        other => panic!("unexpected error: {other}"),
    }
    assert!(sink.events().is_empty());
}

#[tokio::test]
async fn test_malformed_baseline_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "not json").unwrap();
    let (_tx, rx) = watch::channel(false);

    let scheduler = WatchScheduler::new(
        config(&path, Duration::from_secs(30)),
        FlakyProvider::new(baseline_inventory(), vec![]),
    );
    assert!(matches!(
        scheduler.run(rx).await,
        Err(WatchError::BaselineUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_zero_interval_is_rejected() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (_tx, rx) = watch::channel(false);

    let scheduler = WatchScheduler::new(
        config(&baseline, Duration::ZERO),
        FlakyProvider::new(baseline_inventory(), vec![]),
    );
    assert!(matches!(
        scheduler.run(rx).await,
        Err(WatchError::ZeroInterval)
    ));
}

#[tokio::test]
async fn test_overlong_interval_is_rejected_before_any_scan() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let sink = RecordingSink::new();
    let (_tx, rx) = watch::channel(false);

    // Accepted by Duration, but cannot be added to the clock.
    let scheduler = WatchScheduler::new(
        config(&baseline, Duration::from_secs(u64::MAX)),
        FlakyProvider::new(baseline_inventory(), vec![]),
    )
    .with_sink(Box::new(sink.clone()));

    assert!(matches!(
        scheduler.run(rx).await,
        Err(WatchError::InvalidInterval(_))
    ));
    assert!(sink.events().is_empty());
    assert!(parse_duration("18446744073709551615s").is_err());
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_failed_cycle_does_not_stop_the_loop() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    let sink = RecordingSink::stopping_after(3, tx);

    let scheduler = WatchScheduler::new(
        config(&baseline, Duration::from_secs(30)),
        FlakyProvider::new(drifted_inventory(), vec![2]),
    )
    .with_sink(Box::new(sink.clone()));

    let summary = scheduler.run(rx).await.unwrap();

    assert_eq!(
        sink.events(),
        vec![
            Event::Baseline,
            Event::Cycle {
                cycle: 1,
                differences: 1
            },
            Event::Failed { cycle: 2 },
            Event::Cycle {
                cycle: 3,
                differences: 1
            },
            Event::Status,
        ]
    );
    assert_eq!(summary.cycles, 3);
    assert_eq!(summary.failed_cycles, 1);
    assert_eq!(summary.cycles_with_drift, 2);
    assert_eq!(summary.last_difference_count, Some(1));
    assert_eq!(summary.status, CycleStatus::Drifted);
}

#[tokio::test(start_paused = true)]
async fn test_cycles_are_one_interval_apart() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    let sink = RecordingSink::stopping_after(3, tx);
    let interval = Duration::from_secs(60);

    WatchScheduler::new(
        config(&baseline, interval),
        FlakyProvider::new(baseline_inventory(), vec![]),
    )
    .with_sink(Box::new(sink.clone()))
    .run(rx)
    .await
    .unwrap();

    let cycle_times: Vec<Instant> = sink
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, e)| matches!(e, Event::Cycle { .. }))
        .map(|(at, _)| *at)
        .collect();
    assert_eq!(cycle_times.len(), 3);
    for pair in cycle_times.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(gap >= interval, "cycles {gap:?} apart");
        assert!(gap < interval + Duration::from_millis(10), "cycles {gap:?} apart");
    }
}

#[tokio::test(start_paused = true)]
async fn test_clean_cycles_report_no_differences() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    let sink = RecordingSink::stopping_after(2, tx);

    let summary = WatchScheduler::new(
        config(&baseline, Duration::from_secs(5)),
        FlakyProvider::new(baseline_inventory(), vec![]),
    )
    .with_sink(Box::new(sink.clone()))
    .run(rx)
    .await
    .unwrap();

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.cycles_with_drift, 0);
    assert_eq!(summary.status, CycleStatus::Clean);
}

#[tokio::test(start_paused = true)]
async fn test_exit_on_change_stops_after_first_drift() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (_tx, rx) = watch::channel(false);
    let sink = RecordingSink::new();

    let mut watch_config = config(&baseline, Duration::from_secs(30));
    watch_config.exit_on_change = true;

    // Call 1 fails, call 2 drifts, so the loop must survive one failure first.
    let summary = WatchScheduler::new(
        watch_config,
        FlakyProvider::new(drifted_inventory(), vec![1]),
    )
    .with_sink(Box::new(sink.clone()))
    .run(rx)
    .await
    .unwrap();

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.failed_cycles, 1);
    assert_eq!(summary.cycles_with_drift, 1);
    assert_eq!(sink.events().last(), Some(&Event::Status));
}

#[tokio::test]
async fn test_shutdown_before_start_runs_no_cycle() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let sink = RecordingSink::new();

    let summary = WatchScheduler::new(
        config(&baseline, Duration::from_secs(30)),
        FlakyProvider::new(drifted_inventory(), vec![]),
    )
    .with_sink(Box::new(sink.clone()))
    .run(rx)
    .await
    .unwrap();

    assert_eq!(summary.cycles, 0);
    assert_eq!(summary.status, CycleStatus::Pending);
    assert_eq!(sink.events(), vec![Event::Baseline, Event::Status]);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_shutdown_sender_stops_after_initial_cycle() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    drop(tx);

    let summary = WatchScheduler::new(
        config(&baseline, Duration::from_secs(30)),
        FlakyProvider::new(baseline_inventory(), vec![]),
    )
    .run(rx)
    .await
    .unwrap();

    assert_eq!(summary.cycles, 1);
}

#[tokio::test(start_paused = true)]
async fn test_ignored_fields_suppress_drift() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    let sink = RecordingSink::stopping_after(1, tx);

    let mut current = baseline_inventory();
    current.vpcs[0]
        .tags
        .insert("owner".to_string(), "netops".to_string());

    let mut watch_config = config(&baseline, Duration::from_secs(30));
    watch_config.ignore_fields = vec!["tags".to_string()];

    let summary = WatchScheduler::new(watch_config, FlakyProvider::new(current, vec![]))
        .with_sink(Box::new(sink.clone()))
        .run(rx)
        .await
        .unwrap();

    assert_eq!(summary.cycles_with_drift, 0);
}

// ============================================================================
// NDJSON sink
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_ndjson_sink_emits_one_object_per_event() {
    let dir = TempDir::new().unwrap();
    let baseline = write_baseline(&dir);
    let (tx, rx) = watch::channel(false);
    let buffer = SharedBuffer::default();

    WatchScheduler::new(
        config(&baseline, Duration::from_secs(30)),
        FlakyProvider::new(drifted_inventory(), vec![2]),
    )
    .with_sink(Box::new(NdjsonAlertSink::new(Box::new(buffer.clone()))))
    .with_sink(Box::new(RecordingSink::stopping_after(2, tx)))
    .run(rx)
    .await
    .unwrap();

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    let events: Vec<serde_json::Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = events.iter().map(|e| e["type"].as_str().unwrap()).collect();

    assert_eq!(kinds, vec!["baseline", "cycle", "cycle_failed", "status"]);
    assert_eq!(events[1]["summary"]["added"], 1);
    assert_eq!(events[1]["differences"][0]["resource_id"], "vpc-2");
    assert_eq!(events[3]["failed_cycles"], 1);
    assert!(events[3]["last_error"]
        .as_str()
        .unwrap()
        .contains("listing vpcs"));
    assert!(events[3]["last_cycle_at"].is_string());
}
