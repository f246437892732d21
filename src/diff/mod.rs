//! Structural diff engine for network snapshots.
//!
//! Compares a baseline [`Snapshot`](crate::model::Snapshot) against a current
//! one, collection by collection, and reports every added, removed or
//! modified resource as a [`Difference`].
//!
//! Field comparison is explicit: each record type lists its fields in a
//! [`FieldWalker`](fields::FieldWalker) implementation. Lists are compared as
//! opaque containers, tag maps key by key, and the volatile timestamp
//! fields in [`VOLATILE_FIELDS`](fields::VOLATILE_FIELDS) are never compared.
//!
//! # Example
//!
//! ```ignore
//! use netdrift::diff::DiffEngine;
//!
//! let engine = DiffEngine::new().with_ignored_fields(["tags"]);
//! for diff in engine.compare(&baseline, &current) {
//!     println!("{} {}: {} {}", diff.kind, diff.resource_type, diff.resource_id, diff.summary);
//! }
//! ```

mod engine;
pub mod fields;
mod result;

pub use crate::model::ResourceType;
pub use engine::DiffEngine;
pub use result::{DiffSummary, Difference, DifferenceKind};
