//! Topology derivation.
//!
//! Pure functions that compute the derived facts of a snapshot from its raw
//! collections: each subnet's reachability class and governing route table,
//! and each VPC's index of associated resource ids. Derivation is total;
//! every input maps to a defined output.

use super::resources::{InternetGateway, RouteTable, Subnet, SubnetType, Vpc};
use super::snapshot::RawInventory;
use std::collections::{HashMap, HashSet};

/// Destination of the IPv4 default route.
pub const DEFAULT_ROUTE: &str = "0.0.0.0/0";

/// Identifier prefix of NAT gateways.
pub const NAT_GATEWAY_PREFIX: &str = "nat-";

/// Classify a subnet from the routes of its route table.
///
/// A default route whose gateway is one of `internet_gateways` makes the
/// subnet public; otherwise a default route through a NAT gateway makes it
/// private; otherwise it is isolated. Route order does not matter.
#[must_use]
pub fn derive_subnet_type(
    route_table: &RouteTable,
    internet_gateways: &[InternetGateway],
) -> SubnetType {
    let igw_ids: HashSet<&str> = internet_gateways.iter().map(|igw| igw.id.as_str()).collect();
    classify_routes(route_table, &igw_ids)
}

fn classify_routes(route_table: &RouteTable, igw_ids: &HashSet<&str>) -> SubnetType {
    let mut has_igw_route = false;
    let mut has_nat_route = false;

    for route in &route_table.routes {
        if route.destination_cidr != DEFAULT_ROUTE {
            continue;
        }
        if igw_ids.contains(route.gateway_id.as_str()) {
            has_igw_route = true;
        } else if route.gateway_id.starts_with(NAT_GATEWAY_PREFIX) {
            has_nat_route = true;
        }
    }

    if has_igw_route {
        SubnetType::Public
    } else if has_nat_route {
        SubnetType::Private
    } else {
        SubnetType::Isolated
    }
}

/// Find the route table that governs a subnet.
///
/// An explicit association wins (first matching table in collection order);
/// otherwise the main route table of the subnet's VPC applies.
#[must_use]
pub fn resolve_route_table<'a>(
    subnet: &Subnet,
    route_tables: &'a [RouteTable],
) -> Option<&'a RouteTable> {
    route_tables
        .iter()
        .find(|rt| rt.associations.iter().any(|id| *id == subnet.id))
        .or_else(|| {
            route_tables
                .iter()
                .find(|rt| rt.is_main && rt.vpc_id == subnet.vpc_id)
        })
}

/// Set `route_table_id` and `subnet_type` on every subnet.
pub fn classify_subnets(raw: &mut RawInventory) {
    let igw_ids: HashSet<&str> = raw
        .internet_gateways
        .iter()
        .map(|igw| igw.id.as_str())
        .collect();

    for subnet in &mut raw.subnets {
        match resolve_route_table(subnet, &raw.route_tables) {
            Some(rt) => {
                subnet.route_table_id.clone_from(&rt.id);
                subnet.subnet_type = classify_routes(rt, &igw_ids);
            }
            None => {
                subnet.route_table_id.clear();
                subnet.subnet_type = SubnetType::Isolated;
            }
        }
    }
}

/// Per-VPC lists of associated resource ids, grouped by each resource's `vpc_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VpcAssociations {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    pub internet_gateways: Vec<String>,
    pub nat_gateways: Vec<String>,
    pub network_acls: Vec<String>,
}

/// Group every vpc-scoped resource under the VPC it references.
///
/// Resources that reference a VPC absent from the inventory are left out.
/// Ids keep the order of their source collection.
#[must_use]
pub fn build_association_index(raw: &RawInventory) -> HashMap<String, VpcAssociations> {
    let mut index: HashMap<String, VpcAssociations> = raw
        .vpcs
        .iter()
        .map(|vpc| (vpc.id.clone(), VpcAssociations::default()))
        .collect();

    for subnet in &raw.subnets {
        if let Some(entry) = index.get_mut(&subnet.vpc_id) {
            entry.subnets.push(subnet.id.clone());
        }
    }
    for sg in &raw.security_groups {
        if let Some(entry) = index.get_mut(&sg.vpc_id) {
            entry.security_groups.push(sg.id.clone());
        }
    }
    for igw in &raw.internet_gateways {
        if let Some(entry) = index.get_mut(&igw.vpc_id) {
            entry.internet_gateways.push(igw.id.clone());
        }
    }
    for nat in &raw.nat_gateways {
        if let Some(entry) = index.get_mut(&nat.vpc_id) {
            entry.nat_gateways.push(nat.id.clone());
        }
    }
    for acl in &raw.network_acls {
        if let Some(entry) = index.get_mut(&acl.vpc_id) {
            entry.network_acls.push(acl.id.clone());
        }
    }

    index
}

fn apply_associations(vpc: &mut Vpc, associations: VpcAssociations) {
    vpc.subnets = associations.subnets;
    vpc.security_groups = associations.security_groups;
    vpc.internet_gateways = associations.internet_gateways;
    vpc.nat_gateways = associations.nat_gateways;
    vpc.network_acls = associations.network_acls;
}

/// Run every derivation over a raw inventory.
///
/// Previously derived values on the input are discarded and recomputed.
#[must_use]
pub fn derive_topology(mut raw: RawInventory) -> RawInventory {
    classify_subnets(&mut raw);

    let mut index = build_association_index(&raw);
    for vpc in &mut raw.vpcs {
        let associations = index.remove(&vpc.id).unwrap_or_default();
        apply_associations(vpc, associations);
    }

    raw
}
