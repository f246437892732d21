//! Explicit structural field comparison.
//!
//! Every record type lists its comparable fields in a [`FieldWalker`]
//! implementation. Nested records recurse with a dotted path, lists are
//! compared as opaque containers and tag maps are compared key by key.
//! Fields named in the ignore set are skipped at every depth.

use crate::model::{
    IamInlinePolicy, IamPolicy, IamRole, IcmpTypeCode, InternetGateway, NatGateway, NetworkAcl,
    NetworkAclEntry, PeeringConnection, PortRange, Route, RouteTable, SecurityGroup,
    SecurityGroupRule, Subnet, SubnetType, Tags, TransitGateway, TransitGatewayAttachment, Vpc,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt::Display;

/// Fields that change on every observation and are never compared.
pub const VOLATILE_FIELDS: &[&str] = &["scan_time", "create_date", "update_date"];

/// Accumulates detail lines while walking two values of the same type.
pub struct FieldDiff<'a> {
    ignored: &'a HashSet<String>,
    details: Vec<String>,
}

impl<'a> FieldDiff<'a> {
    pub fn new(ignored: &'a HashSet<String>) -> Self {
        Self {
            ignored,
            details: Vec::new(),
        }
    }

    /// Compare one named field below `parent`, unless the name is ignored.
    pub fn field<T: FieldWalker + ?Sized>(&mut self, parent: &str, name: &str, old: &T, new: &T) {
        if self.ignored.contains(name) {
            return;
        }
        let path = if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}.{name}")
        };
        old.walk(new, &path, self);
    }

    /// Record a scalar change when the two values differ.
    pub fn scalar<T: PartialEq + Display + ?Sized>(&mut self, path: &str, old: &T, new: &T) {
        if old != new {
            self.push(format!("{path}: {old} → {new}"));
        }
    }

    /// Whether two values differ under the same ignore set, without recording anything.
    pub fn differs<T: FieldWalker + ?Sized>(&self, old: &T, new: &T) -> bool {
        let mut scratch = FieldDiff::new(self.ignored);
        old.walk(new, "", &mut scratch);
        !scratch.is_empty()
    }

    pub fn push(&mut self, line: String) {
        self.details.push(line);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    #[must_use]
    pub fn into_details(self) -> Vec<String> {
        self.details
    }
}

/// Structural comparison of two values of one type.
pub trait FieldWalker {
    /// Append a detail line to `diff` for every difference between `self` and `other`.
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>);
}

/// Compare two records and return the detail lines, empty when equal.
pub fn diff_fields<T: FieldWalker>(old: &T, new: &T, ignored: &HashSet<String>) -> Vec<String> {
    let mut diff = FieldDiff::new(ignored);
    old.walk(new, "", &mut diff);
    diff.into_details()
}

// ============================================================================
// Leaf values
// ============================================================================

macro_rules! scalar_walker {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldWalker for $ty {
                fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
                    diff.scalar(path, self, other);
                }
            }
        )*
    };
}

scalar_walker!(String, bool, i32, SubnetType, DateTime<Utc>);

impl<T: FieldWalker> FieldWalker for Option<T> {
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
        match (self, other) {
            (None, None) => {}
            (None, Some(_)) => diff.push(format!("{path}: <unset> → <set>")),
            (Some(_), None) => diff.push(format!("{path}: <set> → <unset>")),
            (Some(old), Some(new)) => old.walk(new, path, diff),
        }
    }
}

/// Lists are opaque: one line for a length change, one for any content change.
impl<T: FieldWalker> FieldWalker for Vec<T> {
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
        if self.len() != other.len() {
            diff.push(format!(
                "{path}: length changed from {} to {}",
                self.len(),
                other.len()
            ));
            diff.push(format!("{path}: list contents changed"));
            return;
        }
        if self.iter().zip(other).any(|(a, b)| diff.differs(a, b)) {
            diff.push(format!("{path}: list contents changed"));
        }
    }
}

impl FieldWalker for Tags {
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
        for key in self.keys() {
            if !other.contains_key(key) {
                diff.push(format!("{path}[{key}]: key removed"));
            }
        }
        for (key, new_value) in other {
            match self.get(key) {
                None => diff.push(format!("{path}[{key}]: key added with value {new_value}")),
                Some(old_value) if old_value != new_value => {
                    diff.push(format!("{path}[{key}]: {old_value} → {new_value}"));
                }
                Some(_) => {}
            }
        }
    }
}

// ============================================================================
// Records
// ============================================================================

macro_rules! record_walker {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl FieldWalker for $ty {
            fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
                $( diff.field(path, stringify!($field), &self.$field, &other.$field); )*
            }
        }
    };
}

record_walker!(Vpc {
    id,
    name,
    cidr_block,
    state,
    is_default,
    dhcp_options_id,
    tags,
    subnets,
    security_groups,
    internet_gateways,
    nat_gateways,
    network_acls,
});

// `subnet_type` is persisted as "type"; paths follow the persisted names.
impl FieldWalker for Subnet {
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
        diff.field(path, "id", &self.id, &other.id);
        diff.field(path, "name", &self.name, &other.name);
        diff.field(path, "vpc_id", &self.vpc_id, &other.vpc_id);
        diff.field(path, "cidr_block", &self.cidr_block, &other.cidr_block);
        diff.field(
            path,
            "availability_zone",
            &self.availability_zone,
            &other.availability_zone,
        );
        diff.field(path, "state", &self.state, &other.state);
        diff.field(path, "map_public_ip", &self.map_public_ip, &other.map_public_ip);
        diff.field(path, "tags", &self.tags, &other.tags);
        diff.field(path, "route_table_id", &self.route_table_id, &other.route_table_id);
        diff.field(path, "network_acl_id", &self.network_acl_id, &other.network_acl_id);
        diff.field(path, "type", &self.subnet_type, &other.subnet_type);
    }
}

record_walker!(PeeringConnection {
    id,
    name,
    requester_vpc_id,
    accepter_vpc_id,
    status,
    tags,
});

record_walker!(TransitGateway {
    id,
    name,
    state,
    tags,
    attachments,
});

record_walker!(TransitGatewayAttachment {
    id,
    transit_gateway_id,
    resource_id,
    resource_type,
    state,
    tags,
});

record_walker!(InternetGateway {
    id,
    name,
    vpc_id,
    state,
    tags,
});

record_walker!(NatGateway {
    id,
    name,
    vpc_id,
    subnet_id,
    state,
    public_ip,
    private_ip,
    connectivity_type,
    tags,
});

record_walker!(RouteTable {
    id,
    name,
    vpc_id,
    is_main,
    tags,
    routes,
    associations,
});

record_walker!(Route {
    destination_cidr,
    gateway_id,
    instance_id,
    network_interface_id,
    vpc_peering_id,
    transit_gateway_id,
    state,
    origin,
});

record_walker!(SecurityGroup {
    id,
    name,
    description,
    vpc_id,
    tags,
    ingress_rules,
    egress_rules,
});

record_walker!(SecurityGroupRule {
    ip_protocol,
    from_port,
    to_port,
    cidr_blocks,
    ipv6_cidr_blocks,
    prefix_list_ids,
    referenced_group_id,
    referenced_group_owner_id,
    description,
    tags,
});

record_walker!(NetworkAcl {
    id,
    name,
    vpc_id,
    is_default,
    tags,
    entries,
    associations,
});

record_walker!(NetworkAclEntry {
    rule_number,
    protocol,
    rule_action,
    cidr_block,
    ipv6_cidr_block,
    port_range,
    icmp_type,
    egress,
});

record_walker!(PortRange { from, to });

impl FieldWalker for IcmpTypeCode {
    fn walk(&self, other: &Self, path: &str, diff: &mut FieldDiff<'_>) {
        diff.field(path, "type", &self.icmp_type, &other.icmp_type);
        diff.field(path, "code", &self.code, &other.code);
    }
}

record_walker!(IamRole {
    id,
    name,
    path,
    arn,
    description,
    create_date,
    assume_role_policy_document,
    max_session_duration,
    tags,
    attached_policies,
    inline_policies,
});

record_walker!(IamPolicy {
    arn,
    policy_name,
    policy_id,
    path,
    default_version_id,
    attachment_count,
    permissions_boundary_usage_count,
    is_attachable,
    description,
    create_date,
    update_date,
    tags,
    policy_document,
});

record_walker!(IamInlinePolicy {
    policy_name,
    policy_document,
});
