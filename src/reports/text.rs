//! Text tree reporter.

use super::{ReportError, ReportFormat, SnapshotReporter};
use crate::model::{
    InternetGateway, NatGateway, PeeringConnection, Resource, Snapshot, Subnet, TransitGateway,
    Vpc,
};
use std::collections::HashMap;
use std::fmt::Write as _;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

fn branch(is_last: bool) -> &'static str {
    if is_last {
        LAST_BRANCH
    } else {
        BRANCH
    }
}

/// Renders each VPC as a tree of its subnets, gateways and peerings,
/// followed by transit gateways and a count summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTreeReporter;

impl TextTreeReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Per-VPC lookups built once per render.
struct TreeIndex<'a> {
    subnets: HashMap<&'a str, &'a Subnet>,
    peerings: HashMap<&'a str, Vec<&'a PeeringConnection>>,
    igws: HashMap<&'a str, Vec<&'a InternetGateway>>,
    nats: HashMap<&'a str, Vec<&'a NatGateway>>,
}

impl<'a> TreeIndex<'a> {
    fn build(snapshot: &'a Snapshot) -> Self {
        let subnets = snapshot
            .subnets()
            .iter()
            .map(|s| (s.id.as_str(), s))
            .collect();

        let mut peerings: HashMap<&str, Vec<&PeeringConnection>> = HashMap::new();
        for pcx in snapshot.peering_connections() {
            peerings
                .entry(pcx.requester_vpc_id.as_str())
                .or_default()
                .push(pcx);
            if pcx.accepter_vpc_id != pcx.requester_vpc_id {
                peerings
                    .entry(pcx.accepter_vpc_id.as_str())
                    .or_default()
                    .push(pcx);
            }
        }

        let mut igws: HashMap<&str, Vec<&InternetGateway>> = HashMap::new();
        for igw in snapshot.internet_gateways() {
            igws.entry(igw.vpc_id.as_str()).or_default().push(igw);
        }

        let mut nats: HashMap<&str, Vec<&NatGateway>> = HashMap::new();
        for nat in snapshot.nat_gateways() {
            nats.entry(nat.vpc_id.as_str()).or_default().push(nat);
        }

        Self {
            subnets,
            peerings,
            igws,
            nats,
        }
    }
}

fn write_vpc(out: &mut String, vpc: &Vpc, index: &TreeIndex<'_>) -> std::fmt::Result {
    let default_marker = if vpc.is_default { " [Default]" } else { "" };
    writeln!(
        out,
        "VPC: {} ({}){default_marker}",
        vpc.display_name(),
        vpc.cidr_block
    )?;

    let subnets: Vec<&Subnet> = vpc
        .subnets
        .iter()
        .filter_map(|id| index.subnets.get(id.as_str()).copied())
        .collect();
    let igws = index.igws.get(vpc.id.as_str()).map_or(&[][..], Vec::as_slice);
    let nats = index.nats.get(vpc.id.as_str()).map_or(&[][..], Vec::as_slice);
    let peerings = index
        .peerings
        .get(vpc.id.as_str())
        .map_or(&[][..], Vec::as_slice);

    let total = subnets.len() + igws.len() + nats.len() + peerings.len();
    let mut current = 0;
    let mut next_prefix = || {
        current += 1;
        branch(current == total)
    };

    for subnet in subnets {
        let az = if subnet.availability_zone.is_empty() {
            String::new()
        } else {
            format!(" AZ:{}", subnet.availability_zone)
        };
        writeln!(
            out,
            "{}Subnet: {} ({}) [{}]{az}",
            next_prefix(),
            subnet.display_name(),
            subnet.cidr_block,
            subnet.subnet_type.label()
        )?;
    }

    for igw in igws {
        writeln!(
            out,
            "{}Internet Gateway: {} [{}]",
            next_prefix(),
            igw.display_name(),
            igw.state
        )?;
    }

    for nat in nats {
        let mut ips = String::new();
        if !nat.public_ip.is_empty() {
            write!(ips, " Public:{}", nat.public_ip)?;
        }
        if !nat.private_ip.is_empty() {
            write!(ips, " Private:{}", nat.private_ip)?;
        }
        writeln!(
            out,
            "{}NAT Gateway: {} [{}]{ips}",
            next_prefix(),
            nat.display_name(),
            nat.state
        )?;
    }

    for pcx in peerings {
        let (direction, target) = if vpc.id == pcx.accepter_vpc_id {
            ("←", &pcx.requester_vpc_id)
        } else {
            ("→", &pcx.accepter_vpc_id)
        };
        writeln!(
            out,
            "{}Peering: {} {direction} {target} [{}]",
            next_prefix(),
            pcx.display_name(),
            pcx.status
        )?;
    }

    Ok(())
}

fn write_transit_gateway(
    out: &mut String,
    tgw: &TransitGateway,
    vpc_names: &HashMap<&str, &str>,
) -> std::fmt::Result {
    writeln!(out, "Transit Gateway: {} [{}]", tgw.display_name(), tgw.state)?;

    let count = tgw.attachments.len();
    for (i, attachment) in tgw.attachments.iter().enumerate() {
        let resource = if attachment.resource_type == "vpc" {
            vpc_names
                .get(attachment.resource_id.as_str())
                .copied()
                .unwrap_or(&attachment.resource_id)
        } else {
            &attachment.resource_id
        };
        writeln!(
            out,
            "{}Attachment: {resource} ({}) [{}]",
            branch(i + 1 == count),
            attachment.resource_type,
            attachment.state
        )?;
    }
    Ok(())
}

impl SnapshotReporter for TextTreeReporter {
    fn render(&self, snapshot: &Snapshot) -> Result<String, ReportError> {
        let mut out = String::new();

        writeln!(
            out,
            "AWS Network Infrastructure - Region: {}",
            snapshot.scope().region
        )?;
        writeln!(
            out,
            "Scan Time: {}",
            snapshot.scan_time().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(out)?;

        let index = TreeIndex::build(snapshot);
        let mut vpcs: Vec<&Vpc> = snapshot.vpcs().iter().collect();
        vpcs.sort_by(|a, b| a.id.cmp(&b.id));

        for (i, vpc) in vpcs.iter().enumerate() {
            write_vpc(&mut out, vpc, &index)?;
            if i + 1 < vpcs.len() {
                writeln!(out)?;
            }
        }

        let tgws = snapshot.transit_gateways();
        if !tgws.is_empty() {
            let vpc_names: HashMap<&str, &str> = snapshot
                .vpcs()
                .iter()
                .map(|v| (v.id.as_str(), v.display_name()))
                .collect();
            writeln!(out)?;
            for (i, tgw) in tgws.iter().enumerate() {
                write_transit_gateway(&mut out, tgw, &vpc_names)?;
                if i + 1 < tgws.len() {
                    writeln!(out)?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "Summary:")?;
        writeln!(out, "  VPCs: {}", snapshot.vpcs().len())?;
        writeln!(out, "  Subnets: {}", snapshot.subnets().len())?;
        writeln!(
            out,
            "  Peering Connections: {}",
            snapshot.peering_connections().len()
        )?;
        writeln!(out, "  Transit Gateways: {}", tgws.len())?;
        writeln!(
            out,
            "  Internet Gateways: {}",
            snapshot.internet_gateways().len()
        )?;
        writeln!(out, "  NAT Gateways: {}", snapshot.nat_gateways().len())?;

        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}
