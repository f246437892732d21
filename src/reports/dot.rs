//! Graphviz DOT reporter.

use super::escape::escape_dot;
use super::{ReportError, ReportFormat, SnapshotReporter};
use crate::model::{Resource, Snapshot, SubnetType};
use std::fmt::Write as _;

/// Renders the snapshot topology as a `digraph`.
///
/// VPCs, subnets and gateways become nodes; containment, attachment and
/// peering become edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct DotReporter;

impl DotReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

const fn subnet_color(subnet_type: SubnetType) -> &'static str {
    match subnet_type {
        SubnetType::Public => "lightgreen",
        SubnetType::Private => "lightyellow",
        SubnetType::Isolated => "lightcoral",
    }
}

impl SnapshotReporter for DotReporter {
    fn render(&self, snapshot: &Snapshot) -> Result<String, ReportError> {
        let mut out = String::new();

        out.push_str("digraph AWSNetwork {\n");
        out.push_str("  rankdir=TB;\n");
        out.push_str("  node [shape=box, style=rounded];\n");
        out.push_str("  edge [fontsize=10];\n\n");
        out.push_str("  // Node styles\n");
        out.push_str("  node [fillcolor=lightblue, style=\"rounded,filled\"];\n\n");

        for vpc in snapshot.vpcs() {
            let mut label = format!(
                "{}\\n{}",
                escape_dot(vpc.display_name()),
                escape_dot(&vpc.cidr_block)
            );
            if vpc.is_default {
                label.push_str("\\n[Default]");
            }
            writeln!(
                out,
                "  \"{}\" [label=\"{label}\", fillcolor=lightcyan];",
                escape_dot(&vpc.id)
            )?;
        }

        out.push_str("\n  // Subnets\n");
        for subnet in snapshot.subnets() {
            let id = escape_dot(&subnet.id);
            writeln!(
                out,
                "  \"{id}\" [label=\"{}\\n{}\\n[{}]\", fillcolor={}];",
                escape_dot(subnet.display_name()),
                escape_dot(&subnet.cidr_block),
                subnet.subnet_type.label(),
                subnet_color(subnet.subnet_type)
            )?;
            writeln!(
                out,
                "  \"{}\" -> \"{id}\" [style=dotted, label=\"contains\"];",
                escape_dot(&subnet.vpc_id)
            )?;
        }

        if !snapshot.internet_gateways().is_empty() {
            out.push_str("\n  // Internet Gateways\n");
            for igw in snapshot.internet_gateways() {
                let id = escape_dot(&igw.id);
                writeln!(
                    out,
                    "  \"{id}\" [label=\"{}\\nInternet Gateway\", fillcolor=orange];",
                    escape_dot(igw.display_name())
                )?;
                writeln!(
                    out,
                    "  \"{id}\" -> \"{}\" [label=\"attached\"];",
                    escape_dot(&igw.vpc_id)
                )?;
            }
        }

        if !snapshot.nat_gateways().is_empty() {
            out.push_str("\n  // NAT Gateways\n");
            for nat in snapshot.nat_gateways() {
                let id = escape_dot(&nat.id);
                let mut label = format!("{}\\nNAT Gateway", escape_dot(nat.display_name()));
                if !nat.public_ip.is_empty() {
                    write!(label, "\\n{}", escape_dot(&nat.public_ip))?;
                }
                writeln!(out, "  \"{id}\" [label=\"{label}\", fillcolor=gold];")?;
                writeln!(
                    out,
                    "  \"{id}\" -> \"{}\" [style=dotted, label=\"in\"];",
                    escape_dot(&nat.subnet_id)
                )?;
            }
        }

        if !snapshot.peering_connections().is_empty() {
            out.push_str("\n  // Peering Connections\n");
            for pcx in snapshot.peering_connections() {
                let (style, color) = if pcx.status == "active" {
                    ("solid", "blue")
                } else {
                    ("dashed", "gray")
                };
                writeln!(
                    out,
                    "  \"{}\" -> \"{}\" [label=\"{}\\n[{}]\", style={style}, color={color}];",
                    escape_dot(&pcx.requester_vpc_id),
                    escape_dot(&pcx.accepter_vpc_id),
                    escape_dot(pcx.display_name()),
                    escape_dot(&pcx.status)
                )?;
            }
        }

        if !snapshot.transit_gateways().is_empty() {
            out.push_str("\n  // Transit Gateways\n");
            for tgw in snapshot.transit_gateways() {
                let id = escape_dot(&tgw.id);
                writeln!(
                    out,
                    "  \"{id}\" [label=\"{}\\nTransit Gateway\", fillcolor=purple, fontcolor=white];",
                    escape_dot(tgw.display_name())
                )?;

                // Only VPC attachments have a node to point at.
                for attachment in tgw.attachments.iter().filter(|a| a.resource_type == "vpc") {
                    let style = if attachment.state == "available" {
                        "solid"
                    } else {
                        "dashed"
                    };
                    writeln!(
                        out,
                        "  \"{id}\" -> \"{}\" [label=\"attached\", style={style}, color=purple];",
                        escape_dot(&attachment.resource_id)
                    )?;
                }
            }
        }

        out.push_str("}\n");
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Dot
    }
}
