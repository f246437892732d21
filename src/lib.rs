//! **Snapshots, structural diffs and drift watching for cloud network topology.**
//!
//! `netdrift` captures the network inventory of a region (VPCs, subnets,
//! gateways, route tables, security groups, network ACLs, peering and transit
//! gateway connections, IAM roles) into an immutable [`Snapshot`], derives the
//! topology relationships between those resources, and compares two
//! snapshots structurally. A watch loop re-acquires the inventory on a fixed
//! interval and reports drift against a saved baseline.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: resource records, [`Scope`], [`Snapshot`] and the
//!   [`model::topology`] derivation (subnet reachability class, VPC
//!   association lists).
//! - **[`inventory`]**: the [`InventoryProvider`] trait that lists resources
//!   for a scope, plus in-memory and JSON-file providers and
//!   [`acquire_snapshot`].
//! - **[`diff`]**: the [`DiffEngine`], producing an ordered list of
//!   [`Difference`]s between a baseline and a current snapshot.
//! - **[`storage`]**: persisting and loading snapshots as JSON documents.
//! - **[`watch`]**: the [`WatchScheduler`] and its drift sinks.
//! - **[`reports`]**: text tree, Graphviz and JSON renderings.
//!
//! ## Diffing Two Saved States
//!
//! ```no_run
//! use std::path::Path;
//! use netdrift::{load_snapshot, DiffEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let baseline = load_snapshot(Path::new("working_state.json"))?;
//!     let current = load_snapshot(Path::new("current_state.json"))?;
//!
//!     for diff in DiffEngine::new().compare(&baseline, &current) {
//!         println!("{} {}: {}", diff.kind, diff.resource_type, diff.resource_id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Building a Snapshot
//!
//! ```
//! use chrono::Utc;
//! use netdrift::model::{RawInventory, Scope, Snapshot, Vpc};
//!
//! let raw = RawInventory {
//!     vpcs: vec![Vpc { id: "vpc-1".into(), ..Vpc::default() }],
//!     ..RawInventory::default()
//! };
//! let snapshot = Snapshot::build(raw, Scope::new("us-east-1"), Utc::now()).unwrap();
//! assert_eq!(snapshot.vpcs().len(), 1);
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Config and CLI option structs legitimately carry several flags
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // `old`/`new` and `baseline`/`current` read clearly in diff code
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod inventory;
pub mod model;
pub mod reports;
pub mod storage;
pub mod watch;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use diff::{DiffEngine, DiffSummary, Difference, DifferenceKind, ResourceType};
pub use error::{ErrorContext, NetDriftError, OptionContext, Result};
pub use inventory::{
    acquire_snapshot, FileInventoryProvider, InMemoryInventory, InventoryProvider, ScanStats,
};
pub use model::{RawInventory, Scope, Snapshot};
pub use reports::{create_reporter, DifferencePrinter, ReportFormat, SnapshotReporter};
pub use storage::{load_snapshot, save_snapshot, DEFAULT_STATE_FILE};
pub use watch::{run_watch_loop, WatchConfig, WatchError, WatchScheduler, WatchSummary};
