//! Integration tests for the diff engine.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use netdrift::diff::{DiffEngine, DifferenceKind, ResourceType};
use netdrift::inventory::{acquire_snapshot, FileInventoryProvider};
use netdrift::model::{
    IamRole, InternetGateway, NatGateway, NetworkAcl, PeeringConnection, RawInventory, RouteTable,
    Scope, SecurityGroup, Snapshot, Subnet, TransitGateway, Vpc,
};
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

async fn fixture_snapshot(name: &str) -> Snapshot {
    let provider = FileInventoryProvider::new(fixture_path(name));
    acquire_snapshot(&provider, &Scope::new("us-east-1"))
        .await
        .expect("fixture acquires")
        .0
}

fn vpc(id: &str) -> Vpc {
    Vpc {
        id: id.to_string(),
        name: format!("{id}-name"),
        cidr_block: "10.0.0.0/16".to_string(),
        state: "available".to_string(),
        ..Vpc::default()
    }
}

fn snapshot(raw: RawInventory) -> Snapshot {
    Snapshot::build(raw, Scope::new("us-east-1"), Utc::now()).expect("valid inventory")
}

// ============================================================================
// Basic properties
// ============================================================================

#[test]
fn test_compare_with_self_is_empty() {
    let s = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345")],
        ..RawInventory::default()
    });
    assert!(DiffEngine::new().compare(&s, &s).is_empty());
}

#[test]
fn test_empty_snapshots_have_no_differences() {
    let a = snapshot(RawInventory::default());
    let b = snapshot(RawInventory::default());
    assert!(DiffEngine::new().compare(&a, &b).is_empty());
}

#[test]
fn test_added_vpc_detected() {
    let baseline = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345")],
        ..RawInventory::default()
    });
    let current = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345"), vpc("vpc-67890")],
        ..RawInventory::default()
    });

    let diffs = DiffEngine::new().compare(&baseline, &current);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Added);
    assert_eq!(diffs[0].resource_type, ResourceType::Vpc);
    assert_eq!(diffs[0].resource_id, "vpc-67890");
    assert!(diffs[0].details.is_empty());
}

#[test]
fn test_removed_vpc_detected() {
    let baseline = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345"), vpc("vpc-67890")],
        ..RawInventory::default()
    });
    let current = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-67890")],
        ..RawInventory::default()
    });

    let diffs = DiffEngine::new().compare(&baseline, &current);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Removed);
    assert_eq!(diffs[0].resource_id, "vpc-12345");
    assert_eq!(diffs[0].summary, "vpc was deleted");
}

#[test]
fn test_timestamp_only_change_is_ignored() {
    let role = |day: u32| IamRole {
        id: "AROA1".to_string(),
        name: "ops".to_string(),
        create_date: Some(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
        ..IamRole::default()
    };
    let baseline = snapshot(RawInventory {
        iam_roles: vec![role(1)],
        ..RawInventory::default()
    });
    let current = Snapshot::build(
        RawInventory {
            iam_roles: vec![role(2)],
            ..RawInventory::default()
        },
        Scope::new("us-east-1"),
        Utc::now() + ChronoDuration::hours(1),
    )
    .unwrap();

    assert!(DiffEngine::new().compare(&baseline, &current).is_empty());
}

#[test]
fn test_single_field_change_names_field() {
    let mut changed = vpc("vpc-12345");
    changed.cidr_block = "10.9.0.0/16".to_string();

    let baseline = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345")],
        ..RawInventory::default()
    });
    let current = snapshot(RawInventory {
        vpcs: vec![changed],
        ..RawInventory::default()
    });

    let diffs = DiffEngine::new().compare(&baseline, &current);
    assert_eq!(diffs.len(), 1);
    assert_eq!(diffs[0].kind, DifferenceKind::Modified);
    assert_eq!(
        diffs[0].details,
        vec!["cidr_block: 10.0.0.0/16 → 10.9.0.0/16".to_string()]
    );
}

#[test]
fn test_custom_ignored_field() {
    let mut changed = vpc("vpc-12345");
    changed.tags.insert("owner".to_string(), "netops".to_string());

    let baseline = snapshot(RawInventory {
        vpcs: vec![vpc("vpc-12345")],
        ..RawInventory::default()
    });
    let current = snapshot(RawInventory {
        vpcs: vec![changed],
        ..RawInventory::default()
    });

    assert_eq!(DiffEngine::new().compare(&baseline, &current).len(), 1);
    let engine = DiffEngine::new().with_ignored_fields(["tags".to_string()]);
    assert!(engine.compare(&baseline, &current).is_empty());
}

#[test]
fn test_rule_list_change_is_coarse() {
    let sg = |ports: &[i32]| SecurityGroup {
        id: "sg-1".to_string(),
        vpc_id: "vpc-1".to_string(),
        ingress_rules: ports
            .iter()
            .map(|p| netdrift::model::SecurityGroupRule {
                ip_protocol: "tcp".to_string(),
                from_port: *p,
                to_port: *p,
                ..Default::default()
            })
            .collect(),
        ..SecurityGroup::default()
    };

    let baseline = snapshot(RawInventory {
        security_groups: vec![sg(&[443])],
        ..RawInventory::default()
    });
    let swapped = snapshot(RawInventory {
        security_groups: vec![sg(&[22])],
        ..RawInventory::default()
    });
    let grown = snapshot(RawInventory {
        security_groups: vec![sg(&[443, 22])],
        ..RawInventory::default()
    });

    let engine = DiffEngine::new();
    assert_eq!(
        engine.compare(&baseline, &swapped)[0].details,
        vec!["ingress_rules: list contents changed".to_string()]
    );
    assert_eq!(
        engine.compare(&baseline, &grown)[0].details,
        vec![
            "ingress_rules: length changed from 1 to 2".to_string(),
            "ingress_rules: list contents changed".to_string(),
        ]
    );
}

// ============================================================================
// Fixture drift
// ============================================================================

#[tokio::test]
async fn test_fixture_drift_report() {
    let baseline = fixture_snapshot("inventory.json").await;
    let current = fixture_snapshot("inventory_drifted.json").await;

    let (diffs, summary) = DiffEngine::new().compare_summary(&baseline, &current);
    let listed: Vec<(DifferenceKind, ResourceType, &str)> = diffs
        .iter()
        .map(|d| (d.kind, d.resource_type, d.resource_id.as_str()))
        .collect();

    assert_eq!(
        listed,
        vec![
            (DifferenceKind::Added, ResourceType::Vpc, "vpc-67890"),
            (DifferenceKind::Modified, ResourceType::Vpc, "vpc-12345"),
            (DifferenceKind::Removed, ResourceType::Subnet, "subnet-db-a"),
            (
                DifferenceKind::Modified,
                ResourceType::SecurityGroup,
                "sg-web"
            ),
        ]
    );

    let vpc_details = &diffs[1].details;
    assert!(vpc_details.contains(&"tags[owner]: key added with value netops".to_string()));
    assert!(vpc_details.contains(&"subnets: length changed from 3 to 2".to_string()));

    assert_eq!(summary.total, 4);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.modified, 2);
}

#[tokio::test]
async fn test_fixture_rescan_has_no_drift() {
    let first = fixture_snapshot("inventory.json").await;
    let second = fixture_snapshot("inventory.json").await;

    assert_eq!(first.content_hash(), second.content_hash());
    assert!(DiffEngine::new().compare(&first, &second).is_empty());
}

#[tokio::test]
async fn test_rebuilt_successor_differs_only_in_scan_time() {
    let first = fixture_snapshot("inventory.json").await;
    let later = first.scan_time() + ChronoDuration::days(1);
    let successor =
        Snapshot::build(first.clone().into_inventory(), first.scope().clone(), later).unwrap();

    assert_ne!(successor.scan_time(), first.scan_time());
    assert_eq!(successor.scope(), first.scope());
    assert_eq!(successor.content_hash(), first.content_hash());
    assert!(DiffEngine::new().compare(&first, &successor).is_empty());
}

// ============================================================================
// Cross-type ordering
// ============================================================================

fn one_of_every_type() -> RawInventory {
    // Collections are filled in an order unrelated to the reporting order.
    RawInventory {
        iam_roles: vec![IamRole {
            id: "AROA1".to_string(),
            ..IamRole::default()
        }],
        nat_gateways: vec![NatGateway {
            id: "nat-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..NatGateway::default()
        }],
        internet_gateways: vec![InternetGateway {
            id: "igw-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..InternetGateway::default()
        }],
        transit_gateways: vec![TransitGateway {
            id: "tgw-1".to_string(),
            ..TransitGateway::default()
        }],
        peering_connections: vec![PeeringConnection {
            id: "pcx-1".to_string(),
            ..PeeringConnection::default()
        }],
        route_tables: vec![RouteTable {
            id: "rtb-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..RouteTable::default()
        }],
        network_acls: vec![NetworkAcl {
            id: "acl-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..NetworkAcl::default()
        }],
        security_groups: vec![SecurityGroup {
            id: "sg-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..SecurityGroup::default()
        }],
        subnets: vec![Subnet {
            id: "subnet-1".to_string(),
            vpc_id: "vpc-1".to_string(),
            ..Subnet::default()
        }],
        vpcs: vec![vpc("vpc-1")],
    }
}

#[test]
fn test_types_are_reported_in_fixed_order() {
    let empty = snapshot(RawInventory::default());
    let full = snapshot(one_of_every_type());
    let engine = DiffEngine::new();

    let added: Vec<ResourceType> = engine
        .compare(&empty, &full)
        .iter()
        .map(|d| d.resource_type)
        .collect();
    assert_eq!(added, ResourceType::ALL.to_vec());

    let removed: Vec<ResourceType> = engine
        .compare(&full, &empty)
        .iter()
        .map(|d| d.resource_type)
        .collect();
    assert_eq!(removed, ResourceType::ALL.to_vec());
}
