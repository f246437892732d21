//! One full acquisition: list every collection, derive, freeze.

use super::InventoryProvider;
use crate::error::{ErrorContext, Result};
use crate::model::{RawInventory, Scope, Snapshot};
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Size and listing time of one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub count: usize,
    pub elapsed: Duration,
}

/// Timing of one acquisition, per collection in listing order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    pub total: Duration,
    pub collections: IndexMap<&'static str, CollectionStats>,
}

impl ScanStats {
    fn record(&mut self, collection: &'static str, count: usize, started: Instant) {
        let elapsed = started.elapsed();
        tracing::debug!(collection, count, ?elapsed, "listed collection");
        self.collections
            .insert(collection, CollectionStats { count, elapsed });
    }

    /// Number of records listed for a collection, zero when not listed.
    #[must_use]
    pub fn count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.count)
    }
}

/// Time one listing step and record its size.
macro_rules! list_step {
    ($stats:ident, $name:literal, $call:expr) => {{
        let started = Instant::now();
        let items = $call.await.context(concat!("listing ", $name))?;
        $stats.record($name, items.len(), started);
        items
    }};
}

/// Drive a provider through one acquisition and freeze the result.
///
/// Listing is sequential: VPCs first, then every other collection scoped by
/// the VPC ids just listed. The snapshot's scan time is taken when listing
/// starts.
pub async fn acquire_snapshot(
    provider: &dyn InventoryProvider,
    scope: &Scope,
) -> Result<(Snapshot, ScanStats)> {
    let scan_time = Utc::now();
    let started = Instant::now();
    let mut stats = ScanStats::default();

    tracing::debug!(provider = provider.name(), %scope, "acquiring inventory");

    let vpcs = list_step!(stats, "vpcs", provider.list_vpcs(scope));
    let vpc_ids: Vec<String> = vpcs.iter().map(|v| v.id.clone()).collect();

    let subnets = list_step!(stats, "subnets", provider.list_subnets(scope, &vpc_ids));
    let peering_connections = list_step!(
        stats,
        "peering_connections",
        provider.list_peering_connections(scope, &vpc_ids)
    );
    let transit_gateways = list_step!(
        stats,
        "transit_gateways",
        provider.list_transit_gateways(scope)
    );
    let internet_gateways = list_step!(
        stats,
        "internet_gateways",
        provider.list_internet_gateways(scope, &vpc_ids)
    );
    let nat_gateways = list_step!(
        stats,
        "nat_gateways",
        provider.list_nat_gateways(scope, &vpc_ids)
    );
    let route_tables = list_step!(
        stats,
        "route_tables",
        provider.list_route_tables(scope, &vpc_ids)
    );
    let security_groups = list_step!(
        stats,
        "security_groups",
        provider.list_security_groups(scope, &vpc_ids)
    );
    let network_acls = list_step!(
        stats,
        "network_acls",
        provider.list_network_acls(scope, &vpc_ids)
    );
    let iam_roles = list_step!(stats, "iam_roles", provider.list_iam_roles(scope));

    let raw = RawInventory {
        vpcs,
        subnets,
        peering_connections,
        transit_gateways,
        internet_gateways,
        nat_gateways,
        route_tables,
        security_groups,
        network_acls,
        iam_roles,
    };

    let snapshot = Snapshot::build(raw, scope.clone(), scan_time)
        .with_context(|| format!("building snapshot from {}", provider.name()))?;
    stats.total = started.elapsed();

    tracing::debug!(total = ?stats.total, "acquisition complete");
    Ok((snapshot, stats))
}
