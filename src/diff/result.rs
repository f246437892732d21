//! Diff result structures.

use crate::model::ResourceType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of structural change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifferenceKind {
    Added,
    Removed,
    Modified,
}

impl DifferenceKind {
    /// Upper-case label used in printed reports.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Removed => "REMOVED",
            Self::Modified => "MODIFIED",
        }
    }

    /// Single-character marker used in printed reports.
    #[must_use]
    pub const fn symbol(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Removed => '-',
            Self::Modified => '~',
        }
    }
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One structural change between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    pub kind: DifferenceKind,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub summary: String,
    /// Field-level change lines, empty for added and removed resources
    #[serde(default)]
    pub details: Vec<String>,
}

impl Difference {
    pub fn added(resource_type: ResourceType, resource_id: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Added,
            resource_type,
            resource_id: resource_id.into(),
            summary: format!("New {} created", type_noun(resource_type)),
            details: Vec::new(),
        }
    }

    pub fn removed(resource_type: ResourceType, resource_id: impl Into<String>) -> Self {
        Self {
            kind: DifferenceKind::Removed,
            resource_type,
            resource_id: resource_id.into(),
            summary: format!("{} was deleted", type_noun(resource_type)),
            details: Vec::new(),
        }
    }

    pub fn modified(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            kind: DifferenceKind::Modified,
            resource_type,
            resource_id: resource_id.into(),
            summary: format!("{} configuration changed", type_noun(resource_type)),
            details,
        }
    }
}

fn type_noun(resource_type: ResourceType) -> String {
    resource_type.as_str().to_lowercase()
}

/// Counts over a difference list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    /// Differences per resource type, in reporting order, omitting zero counts
    pub per_type: IndexMap<ResourceType, usize>,
}

impl DiffSummary {
    pub fn from_differences(differences: &[Difference]) -> Self {
        let mut summary = Self::default();
        for kind in ResourceType::ALL {
            let count = differences
                .iter()
                .filter(|d| d.resource_type == kind)
                .count();
            if count > 0 {
                summary.per_type.insert(kind, count);
            }
        }
        for diff in differences {
            match diff.kind {
                DifferenceKind::Added => summary.added += 1,
                DifferenceKind::Removed => summary.removed += 1,
                DifferenceKind::Modified => summary.modified += 1,
            }
        }
        summary.total = differences.len();
        summary
    }

    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.total > 0
    }
}
