//! Structural diff engine implementation.

use super::fields::{diff_fields, FieldWalker, VOLATILE_FIELDS};
use super::{DiffSummary, Difference};
use crate::model::{Resource, ResourceType, Snapshot};
use std::collections::{BTreeMap, HashSet};

/// Structural diff engine for comparing snapshots.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    ignored_fields: HashSet<String>,
}

impl DiffEngine {
    /// Create a new diff engine that skips only the volatile timestamp fields
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignored_fields: VOLATILE_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }

    /// Skip additional field names at every depth
    #[must_use]
    pub fn with_ignored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Field names currently skipped
    #[must_use]
    pub fn ignored_fields(&self) -> &HashSet<String> {
        &self.ignored_fields
    }

    /// Compare a baseline against a current snapshot.
    ///
    /// Differences are grouped by resource type in [`ResourceType::ALL`] order; within a
    /// type, additions come first, then removals, then modifications, each
    /// sorted by resource id.
    #[must_use]
    pub fn compare(&self, baseline: &Snapshot, current: &Snapshot) -> Vec<Difference> {
        let mut differences = Vec::new();

        // Identical collections cannot differ under any ignore set
        if baseline.content_hash() == current.content_hash() {
            return differences;
        }

        for resource_type in ResourceType::ALL {
            let out = &mut differences;
            match resource_type {
                ResourceType::Vpc => self.compare_collection(baseline.vpcs(), current.vpcs(), out),
                ResourceType::Subnet => {
                    self.compare_collection(baseline.subnets(), current.subnets(), out);
                }
                ResourceType::SecurityGroup => self.compare_collection(
                    baseline.security_groups(),
                    current.security_groups(),
                    out,
                ),
                ResourceType::NetworkAcl => {
                    self.compare_collection(baseline.network_acls(), current.network_acls(), out);
                }
                ResourceType::RouteTable => {
                    self.compare_collection(baseline.route_tables(), current.route_tables(), out);
                }
                ResourceType::PeeringConnection => self.compare_collection(
                    baseline.peering_connections(),
                    current.peering_connections(),
                    out,
                ),
                ResourceType::TransitGateway => self.compare_collection(
                    baseline.transit_gateways(),
                    current.transit_gateways(),
                    out,
                ),
                ResourceType::InternetGateway => self.compare_collection(
                    baseline.internet_gateways(),
                    current.internet_gateways(),
                    out,
                ),
                ResourceType::NatGateway => {
                    self.compare_collection(baseline.nat_gateways(), current.nat_gateways(), out);
                }
                ResourceType::IamRole => {
                    self.compare_collection(baseline.iam_roles(), current.iam_roles(), out);
                }
            }
        }

        tracing::debug!(differences = differences.len(), "compared snapshots");
        differences
    }

    /// Compare and summarize in one call
    #[must_use]
    pub fn compare_summary(
        &self,
        baseline: &Snapshot,
        current: &Snapshot,
    ) -> (Vec<Difference>, DiffSummary) {
        let differences = self.compare(baseline, current);
        let summary = DiffSummary::from_differences(&differences);
        (differences, summary)
    }

    fn compare_collection<T>(&self, baseline: &[T], current: &[T], out: &mut Vec<Difference>)
    where
        T: Resource + FieldWalker,
    {
        let old: BTreeMap<&str, &T> = baseline.iter().map(|r| (r.id(), r)).collect();
        let new: BTreeMap<&str, &T> = current.iter().map(|r| (r.id(), r)).collect();

        for id in new.keys().filter(|id| !old.contains_key(*id)) {
            out.push(Difference::added(T::RESOURCE_TYPE, *id));
        }
        for id in old.keys().filter(|id| !new.contains_key(*id)) {
            out.push(Difference::removed(T::RESOURCE_TYPE, *id));
        }
        for (id, old_value) in &old {
            if let Some(new_value) = new.get(id) {
                let details = diff_fields(*old_value, *new_value, &self.ignored_fields);
                if !details.is_empty() {
                    out.push(Difference::modified(T::RESOURCE_TYPE, *id, details));
                }
            }
        }
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
