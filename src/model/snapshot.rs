//! The snapshot aggregate and its persisted document form.

use super::resources::{
    IamRole, InternetGateway, NatGateway, NetworkAcl, PeeringConnection, Resource, ResourceType,
    RouteTable, SecurityGroup, Subnet, TransitGateway, Vpc,
};
use super::topology::derive_topology;
use crate::error::{NetDriftError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// The region and optional single-VPC filter bounding an inventory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

impl Scope {
    /// Scope covering a whole region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            vpc_id: None,
        }
    }

    /// Restrict the scope to a single VPC.
    #[must_use]
    pub fn with_vpc(mut self, vpc_id: impl Into<String>) -> Self {
        self.vpc_id = Some(vpc_id.into());
        self
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.vpc_id {
            Some(vpc) => write!(f, "{}/{vpc}", self.region),
            None => f.write_str(&self.region),
        }
    }
}

/// Raw resource collections as returned by an inventory provider.
///
/// This is the mutable staging area: topology derivation fills in the
/// derived fields here before [`Snapshot::build`] freezes the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInventory {
    pub vpcs: Vec<Vpc>,
    pub subnets: Vec<Subnet>,
    pub peering_connections: Vec<PeeringConnection>,
    pub transit_gateways: Vec<TransitGateway>,
    pub internet_gateways: Vec<InternetGateway>,
    pub nat_gateways: Vec<NatGateway>,
    pub route_tables: Vec<RouteTable>,
    pub security_groups: Vec<SecurityGroup>,
    pub network_acls: Vec<NetworkAcl>,
    pub iam_roles: Vec<IamRole>,
}

impl RawInventory {
    /// Reject duplicate identifiers within any one collection.
    pub fn check_unique_ids(&self) -> Result<()> {
        check_unique(&self.vpcs)?;
        check_unique(&self.subnets)?;
        check_unique(&self.peering_connections)?;
        check_unique(&self.transit_gateways)?;
        check_unique(&self.internet_gateways)?;
        check_unique(&self.nat_gateways)?;
        check_unique(&self.route_tables)?;
        check_unique(&self.security_groups)?;
        check_unique(&self.network_acls)?;
        check_unique(&self.iam_roles)?;
        Ok(())
    }
}

fn check_unique<T: Resource>(items: &[T]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(NetDriftError::validation(format!(
                "duplicate id '{}' in {}",
                item.id(),
                T::RESOURCE_TYPE.collection()
            )));
        }
    }
    Ok(())
}

/// Immutable, timestamped view of a network for one scope.
///
/// A snapshot is built once from a [`RawInventory`] and never mutated.
/// Producing a successor means taking the collections back out with
/// [`Snapshot::into_inventory`] and building again.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SnapshotDocument")]
pub struct Snapshot {
    scope: Scope,
    scan_time: DateTime<Utc>,
    inventory: RawInventory,
    content_hash: u64,
}

impl Snapshot {
    /// Derive topology over the raw collections and freeze the result.
    ///
    /// Fails only when a collection holds the same identifier twice.
    pub fn build(raw: RawInventory, scope: Scope, scan_time: DateTime<Utc>) -> Result<Self> {
        let inventory = derive_topology(raw);
        Self::freeze(inventory, scope, scan_time)
    }

    fn freeze(inventory: RawInventory, scope: Scope, scan_time: DateTime<Utc>) -> Result<Self> {
        inventory.check_unique_ids()?;
        let content_hash = hash_inventory(&inventory);
        Ok(Self {
            scope,
            scan_time,
            inventory,
            content_hash,
        })
    }

    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    #[must_use]
    pub fn scan_time(&self) -> DateTime<Utc> {
        self.scan_time
    }

    #[must_use]
    pub fn vpcs(&self) -> &[Vpc] {
        &self.inventory.vpcs
    }

    #[must_use]
    pub fn subnets(&self) -> &[Subnet] {
        &self.inventory.subnets
    }

    #[must_use]
    pub fn peering_connections(&self) -> &[PeeringConnection] {
        &self.inventory.peering_connections
    }

    #[must_use]
    pub fn transit_gateways(&self) -> &[TransitGateway] {
        &self.inventory.transit_gateways
    }

    #[must_use]
    pub fn internet_gateways(&self) -> &[InternetGateway] {
        &self.inventory.internet_gateways
    }

    #[must_use]
    pub fn nat_gateways(&self) -> &[NatGateway] {
        &self.inventory.nat_gateways
    }

    #[must_use]
    pub fn route_tables(&self) -> &[RouteTable] {
        &self.inventory.route_tables
    }

    #[must_use]
    pub fn security_groups(&self) -> &[SecurityGroup] {
        &self.inventory.security_groups
    }

    #[must_use]
    pub fn network_acls(&self) -> &[NetworkAcl] {
        &self.inventory.network_acls
    }

    #[must_use]
    pub fn iam_roles(&self) -> &[IamRole] {
        &self.inventory.iam_roles
    }

    /// Number of records per collection, in reporting order.
    #[must_use]
    pub fn counts(&self) -> Vec<(ResourceType, usize)> {
        ResourceType::ALL
            .iter()
            .map(|kind| (*kind, self.count_of(*kind)))
            .collect()
    }

    /// Number of records in one collection.
    #[must_use]
    pub fn count_of(&self, kind: ResourceType) -> usize {
        let inv = &self.inventory;
        match kind {
            ResourceType::Vpc => inv.vpcs.len(),
            ResourceType::Subnet => inv.subnets.len(),
            ResourceType::SecurityGroup => inv.security_groups.len(),
            ResourceType::NetworkAcl => inv.network_acls.len(),
            ResourceType::RouteTable => inv.route_tables.len(),
            ResourceType::PeeringConnection => inv.peering_connections.len(),
            ResourceType::TransitGateway => inv.transit_gateways.len(),
            ResourceType::InternetGateway => inv.internet_gateways.len(),
            ResourceType::NatGateway => inv.nat_gateways.len(),
            ResourceType::IamRole => inv.iam_roles.len(),
        }
    }

    /// xxh3 hash of the collections, independent of scan time, scope and record order.
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        self.content_hash
    }

    #[must_use]
    pub fn find_vpc(&self, id: &str) -> Option<&Vpc> {
        self.inventory.vpcs.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn find_subnet(&self, id: &str) -> Option<&Subnet> {
        self.inventory.subnets.iter().find(|s| s.id == id)
    }

    /// Give back the collections, e.g. to build a successor snapshot.
    #[must_use]
    pub fn into_inventory(self) -> RawInventory {
        self.inventory
    }
}

fn hash_collection<T: Resource + Serialize>(items: &[T], out: &mut Vec<u8>) {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| a.id().cmp(b.id()));

    out.extend(T::RESOURCE_TYPE.collection().as_bytes());
    for item in sorted {
        if let Ok(json) = serde_json::to_vec(item) {
            out.extend(json);
        }
    }
}

fn hash_inventory(inv: &RawInventory) -> u64 {
    let mut hasher_input = Vec::new();
    hash_collection(&inv.vpcs, &mut hasher_input);
    hash_collection(&inv.subnets, &mut hasher_input);
    hash_collection(&inv.security_groups, &mut hasher_input);
    hash_collection(&inv.network_acls, &mut hasher_input);
    hash_collection(&inv.route_tables, &mut hasher_input);
    hash_collection(&inv.peering_connections, &mut hasher_input);
    hash_collection(&inv.transit_gateways, &mut hasher_input);
    hash_collection(&inv.internet_gateways, &mut hasher_input);
    hash_collection(&inv.nat_gateways, &mut hasher_input);
    hash_collection(&inv.iam_roles, &mut hasher_input);
    xxh3_64(&hasher_input)
}

// ============================================================================
// Persisted document
// ============================================================================

#[derive(Serialize)]
struct SnapshotDocumentRef<'a> {
    scope: &'a Scope,
    scan_time: &'a DateTime<Utc>,
    #[serde(flatten)]
    inventory: &'a RawInventory,
}

#[derive(Deserialize)]
struct SnapshotDocument {
    scope: Scope,
    scan_time: DateTime<Utc>,
    #[serde(flatten)]
    inventory: RawInventory,
}

impl TryFrom<SnapshotDocument> for Snapshot {
    type Error = NetDriftError;

    fn try_from(doc: SnapshotDocument) -> Result<Self> {
        Self::freeze(doc.inventory, doc.scope, doc.scan_time)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SnapshotDocumentRef {
            scope: &self.scope,
            scan_time: &self.scan_time,
            inventory: &self.inventory,
        }
        .serialize(serializer)
    }
}
