//! Integration tests for snapshot reports over the fixture inventory.

use chrono::{TimeZone, Utc};
use netdrift::model::{RawInventory, Scope, Snapshot};
use netdrift::reports::{
    create_reporter, DotReporter, JsonReporter, ReportFormat, SnapshotReporter, TextTreeReporter,
};
use std::path::Path;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_snapshot() -> Snapshot {
    let content = std::fs::read_to_string(Path::new(FIXTURES_DIR).join("inventory.json"))
        .expect("fixture readable");
    let raw: RawInventory = serde_json::from_str(&content).expect("fixture parses");
    let scan_time = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    Snapshot::build(raw, Scope::new("us-east-1"), scan_time).expect("fixture is valid")
}

// ============================================================================
// Text tree
// ============================================================================

#[test]
fn test_text_tree_for_fixture() {
    let text = TextTreeReporter::new().render(&fixture_snapshot()).unwrap();

    insta::assert_snapshot!(text, @r"
    AWS Network Infrastructure - Region: us-east-1
    Scan Time: 2024-05-06 07:08:09

    VPC: production (10.0.0.0/16)
    ├── Subnet: public-a (10.0.1.0/24) [Public] AZ:us-east-1a
    ├── Subnet: private-a (10.0.2.0/24) [Private] AZ:us-east-1a
    ├── Subnet: db-a (10.0.3.0/24) [Isolated] AZ:us-east-1a
    ├── Internet Gateway: prod-igw [available]
    ├── NAT Gateway: prod-nat [available] Public:54.1.2.3 Private:10.0.1.10
    └── Peering: prod-to-shared → vpc-22222 [active]

    VPC: shared-services (10.1.0.0/16)
    ├── Subnet: shared-a (10.1.1.0/24) [Isolated] AZ:us-east-1b
    └── Peering: prod-to-shared ← vpc-12345 [active]

    Transit Gateway: core-tgw [available]
    ├── Attachment: production (vpc) [available]
    └── Attachment: vpn-44444 (vpn) [available]

    Summary:
      VPCs: 2
      Subnets: 4
      Peering Connections: 1
      Transit Gateways: 1
      Internet Gateways: 1
      NAT Gateways: 1
    ");
}

// ============================================================================
// Graphviz
// ============================================================================

#[test]
fn test_dot_graph_for_fixture() {
    let dot = DotReporter::new().render(&fixture_snapshot()).unwrap();

    assert!(dot.starts_with("digraph AWSNetwork {\n"));
    assert!(dot.ends_with("}\n"));
    assert!(dot.contains(
        "\"subnet-pub-a\" [label=\"public-a\\n10.0.1.0/24\\n[Public]\", fillcolor=lightgreen];"
    ));
    assert!(dot.contains("fillcolor=lightyellow"));
    assert!(dot.contains("fillcolor=lightcoral"));
    assert!(dot.contains("\"igw-12345\" -> \"vpc-12345\" [label=\"attached\"];"));
    assert!(dot.contains("\"nat-12345\" -> \"subnet-pub-a\" [style=dotted, label=\"in\"];"));
    assert!(dot.contains(
        "\"vpc-12345\" -> \"vpc-22222\" [label=\"prod-to-shared\\n[active]\", style=solid, color=blue];"
    ));
    // VPN attachments have no node to point at.
    assert!(dot.contains("\"tgw-33333\" -> \"vpc-12345\""));
    assert!(!dot.contains("vpn-44444"));
}

#[test]
fn test_dot_braces_balance() {
    let dot = DotReporter::new().render(&fixture_snapshot()).unwrap();
    assert_eq!(dot.matches('{').count(), dot.matches('}').count());
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn test_json_report_is_persisted_document() {
    let snapshot = fixture_snapshot();
    let json = JsonReporter::new().render(&snapshot).unwrap();

    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["scope"]["region"], "us-east-1");
    assert_eq!(value["vpcs"].as_array().unwrap().len(), 2);
}

#[test]
fn test_compact_json_is_single_line() {
    let json = JsonReporter::new()
        .pretty(false)
        .render(&fixture_snapshot())
        .unwrap();
    assert_eq!(json.trim_end().lines().count(), 1);
}

#[test]
fn test_write_report_matches_render() {
    let snapshot = fixture_snapshot();
    for format in [ReportFormat::Text, ReportFormat::Dot, ReportFormat::Json] {
        let reporter = create_reporter(format);
        let mut buf = Vec::new();
        reporter.write_report(&snapshot, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            reporter.render(&snapshot).unwrap()
        );
    }
}
