//! Network resource records.
//!
//! Relationships between resources are expressed only through identifier
//! fields (`vpc_id`, `associations`, ...), never by embedding one record in
//! another. The records serialize with snake_case keys and tolerate missing
//! fields so partially populated inventory documents still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key/value tags attached to a resource.
pub type Tags = BTreeMap<String, String>;

/// The closed set of resource collections held by a snapshot.
///
/// Declaration order is the order in which differences are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "VPC")]
    Vpc,
    Subnet,
    SecurityGroup,
    #[serde(rename = "NetworkACL")]
    NetworkAcl,
    RouteTable,
    PeeringConnection,
    TransitGateway,
    InternetGateway,
    #[serde(rename = "NATGateway")]
    NatGateway,
    #[serde(rename = "IAMRole")]
    IamRole,
}

impl ResourceType {
    /// Every resource type, in reporting order.
    pub const ALL: [Self; 10] = [
        Self::Vpc,
        Self::Subnet,
        Self::SecurityGroup,
        Self::NetworkAcl,
        Self::RouteTable,
        Self::PeeringConnection,
        Self::TransitGateway,
        Self::InternetGateway,
        Self::NatGateway,
        Self::IamRole,
    ];

    /// Display name used in difference reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Vpc => "VPC",
            Self::Subnet => "Subnet",
            Self::SecurityGroup => "SecurityGroup",
            Self::NetworkAcl => "NetworkACL",
            Self::RouteTable => "RouteTable",
            Self::PeeringConnection => "PeeringConnection",
            Self::TransitGateway => "TransitGateway",
            Self::InternetGateway => "InternetGateway",
            Self::NatGateway => "NATGateway",
            Self::IamRole => "IAMRole",
        }
    }

    /// Name of the snapshot collection holding this type.
    #[must_use]
    pub const fn collection(&self) -> &'static str {
        match self {
            Self::Vpc => "vpcs",
            Self::Subnet => "subnets",
            Self::SecurityGroup => "security_groups",
            Self::NetworkAcl => "network_acls",
            Self::RouteTable => "route_tables",
            Self::PeeringConnection => "peering_connections",
            Self::TransitGateway => "transit_gateways",
            Self::InternetGateway => "internet_gateways",
            Self::NatGateway => "nat_gateways",
            Self::IamRole => "iam_roles",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A top-level record stored in one of the snapshot collections.
pub trait Resource {
    /// Collection this record belongs to.
    const RESOURCE_TYPE: ResourceType;

    /// Provider-assigned identifier, unique within the collection.
    fn id(&self) -> &str;

    /// Display name, falling back to the identifier when unnamed.
    fn display_name(&self) -> &str;
}

macro_rules! impl_resource {
    ($ty:ty, $kind:expr) => {
        impl Resource for $ty {
            const RESOURCE_TYPE: ResourceType = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn display_name(&self) -> &str {
                if self.name.is_empty() {
                    &self.id
                } else {
                    &self.name
                }
            }
        }
    };
}

/// Reachability class of a subnet, derived from its route table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetType {
    /// Default route through an internet gateway
    Public,
    /// Default route through a NAT gateway
    Private,
    /// No default route out of the VPC
    #[default]
    Isolated,
}

impl SubnetType {
    /// Capitalized label for presentation ("Public").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Private",
            Self::Isolated => "Isolated",
        }
    }
}

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Isolated => write!(f, "isolated"),
        }
    }
}

/// A virtual private cloud.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc {
    pub id: String,
    pub name: String,
    pub cidr_block: String,
    pub state: String,
    pub is_default: bool,
    pub dhcp_options_id: String,
    pub tags: Tags,
    /// Derived: ids of subnets whose `vpc_id` is this VPC
    pub subnets: Vec<String>,
    /// Derived: ids of security groups in this VPC
    pub security_groups: Vec<String>,
    /// Derived: ids of internet gateways attached to this VPC
    pub internet_gateways: Vec<String>,
    /// Derived: ids of NAT gateways in this VPC
    pub nat_gateways: Vec<String>,
    /// Derived: ids of network ACLs in this VPC
    pub network_acls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subnet {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub cidr_block: String,
    pub availability_zone: String,
    pub state: String,
    pub map_public_ip: bool,
    pub tags: Tags,
    /// Derived: the route table governing this subnet, empty if none resolves
    pub route_table_id: String,
    pub network_acl_id: String,
    /// Derived reachability class
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeeringConnection {
    pub id: String,
    pub name: String,
    pub requester_vpc_id: String,
    pub accepter_vpc_id: String,
    pub status: String,
    pub tags: Tags,
}

impl PeeringConnection {
    /// Whether either side of the peering is the given VPC.
    #[must_use]
    pub fn touches(&self, vpc_id: &str) -> bool {
        self.requester_vpc_id == vpc_id || self.accepter_vpc_id == vpc_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitGateway {
    pub id: String,
    pub name: String,
    pub state: String,
    pub tags: Tags,
    pub attachments: Vec<TransitGatewayAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitGatewayAttachment {
    pub id: String,
    pub transit_gateway_id: String,
    pub resource_id: String,
    pub resource_type: String,
    pub state: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternetGateway {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub state: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatGateway {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub subnet_id: String,
    pub state: String,
    pub public_ip: String,
    pub private_ip: String,
    pub connectivity_type: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteTable {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub is_main: bool,
    pub tags: Tags,
    pub routes: Vec<Route>,
    /// Explicitly associated subnet ids
    pub associations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub destination_cidr: String,
    pub gateway_id: String,
    pub instance_id: String,
    pub network_interface_id: String,
    pub vpc_peering_id: String,
    pub transit_gateway_id: String,
    pub state: String,
    pub origin: String,
}

impl Route {
    /// Route with only a destination and a gateway set.
    #[must_use]
    pub fn to_gateway(destination_cidr: impl Into<String>, gateway_id: impl Into<String>) -> Self {
        Self {
            destination_cidr: destination_cidr.into(),
            gateway_id: gateway_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    pub description: String,
    pub vpc_id: String,
    pub tags: Tags,
    pub ingress_rules: Vec<SecurityGroupRule>,
    pub egress_rules: Vec<SecurityGroupRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroupRule {
    pub ip_protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    pub cidr_blocks: Vec<String>,
    pub ipv6_cidr_blocks: Vec<String>,
    pub prefix_list_ids: Vec<String>,
    pub referenced_group_id: String,
    pub referenced_group_owner_id: String,
    pub description: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAcl {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub is_default: bool,
    pub tags: Tags,
    pub entries: Vec<NetworkAclEntry>,
    /// Associated subnet ids
    pub associations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkAclEntry {
    pub rule_number: i32,
    pub protocol: String,
    pub rule_action: String,
    pub cidr_block: String,
    pub ipv6_cidr_block: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_range: Option<PortRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icmp_type: Option<IcmpTypeCode>,
    pub egress: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: i32,
    pub to: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcmpTypeCode {
    #[serde(rename = "type")]
    pub icmp_type: i32,
    pub code: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamRole {
    pub id: String,
    pub name: String,
    pub path: String,
    pub arn: String,
    pub description: String,
    pub create_date: Option<DateTime<Utc>>,
    pub assume_role_policy_document: String,
    pub max_session_duration: i32,
    pub tags: Tags,
    pub attached_policies: Vec<IamPolicy>,
    pub inline_policies: Vec<IamInlinePolicy>,
}

/// A managed policy attached to a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamPolicy {
    pub arn: String,
    pub policy_name: String,
    pub policy_id: String,
    pub path: String,
    pub default_version_id: String,
    pub attachment_count: i32,
    pub permissions_boundary_usage_count: i32,
    pub is_attachable: bool,
    pub description: String,
    pub create_date: Option<DateTime<Utc>>,
    pub update_date: Option<DateTime<Utc>>,
    pub tags: Tags,
    pub policy_document: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamInlinePolicy {
    pub policy_name: String,
    pub policy_document: String,
}

impl_resource!(Vpc, ResourceType::Vpc);
impl_resource!(Subnet, ResourceType::Subnet);
impl_resource!(SecurityGroup, ResourceType::SecurityGroup);
impl_resource!(NetworkAcl, ResourceType::NetworkAcl);
impl_resource!(RouteTable, ResourceType::RouteTable);
impl_resource!(PeeringConnection, ResourceType::PeeringConnection);
impl_resource!(TransitGateway, ResourceType::TransitGateway);
impl_resource!(InternetGateway, ResourceType::InternetGateway);
impl_resource!(NatGateway, ResourceType::NatGateway);
impl_resource!(IamRole, ResourceType::IamRole);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_order_and_names() {
        let names: Vec<_> = ResourceType::ALL.iter().map(ResourceType::as_str).collect();
        assert_eq!(
            names,
            vec![
                "VPC",
                "Subnet",
                "SecurityGroup",
                "NetworkACL",
                "RouteTable",
                "PeeringConnection",
                "TransitGateway",
                "InternetGateway",
                "NATGateway",
                "IAMRole",
            ]
        );
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let vpc = Vpc {
            id: "vpc-1".to_string(),
            ..Vpc::default()
        };
        assert_eq!(vpc.display_name(), "vpc-1");

        let named = Vpc {
            id: "vpc-1".to_string(),
            name: "prod".to_string(),
            ..Vpc::default()
        };
        assert_eq!(named.display_name(), "prod");
    }

    #[test]
    fn test_subnet_type_serializes_lowercase() {
        let json = serde_json::to_string(&SubnetType::Private).unwrap();
        assert_eq!(json, "\"private\"");
        assert_eq!(SubnetType::Public.label(), "Public");
        assert_eq!(SubnetType::default(), SubnetType::Isolated);
    }

    #[test]
    fn test_subnet_type_key_is_type() {
        let subnet: Subnet =
            serde_json::from_str(r#"{"id":"subnet-1","vpc_id":"vpc-1","type":"public"}"#).unwrap();
        assert_eq!(subnet.subnet_type, SubnetType::Public);
        assert!(subnet.tags.is_empty());
    }

    #[test]
    fn test_acl_entry_optional_ranges_omitted() {
        let entry = NetworkAclEntry {
            rule_number: 100,
            protocol: "6".to_string(),
            ..NetworkAclEntry::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("port_range").is_none());
        assert!(json.get("icmp_type").is_none());
    }

    #[test]
    fn test_peering_touches_either_side() {
        let pcx = PeeringConnection {
            id: "pcx-1".to_string(),
            requester_vpc_id: "vpc-a".to_string(),
            accepter_vpc_id: "vpc-b".to_string(),
            ..PeeringConnection::default()
        };
        assert!(pcx.touches("vpc-a"));
        assert!(pcx.touches("vpc-b"));
        assert!(!pcx.touches("vpc-c"));
    }
}
