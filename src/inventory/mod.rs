//! Inventory providers.
//!
//! An [`InventoryProvider`] lists the raw resource collections for a
//! [`Scope`]. Talking to a cloud API is left to implementors; the crate
//! ships an in-memory provider and one backed by a JSON document on disk,
//! plus [`acquire_snapshot`] which drives a provider through one full
//! acquisition and freezes the result.

mod acquire;
mod file;
mod memory;

pub use crate::model::RawInventory;
pub use acquire::{acquire_snapshot, CollectionStats, ScanStats};
pub use file::FileInventoryProvider;
pub use memory::InMemoryInventory;

use crate::error::Result;
use crate::model::{
    IamRole, InternetGateway, NatGateway, NetworkAcl, PeeringConnection, RouteTable, Scope,
    SecurityGroup, Subnet, TransitGateway, Vpc,
};
use async_trait::async_trait;

/// Source of raw resource listings.
///
/// `list_vpcs` runs first; the VPC ids it returns scope every vpc-bound
/// listing that follows. Collections a provider does not cover default to
/// empty.
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn list_vpcs(&self, scope: &Scope) -> Result<Vec<Vpc>>;

    async fn list_subnets(&self, _scope: &Scope, _vpc_ids: &[String]) -> Result<Vec<Subnet>> {
        Ok(Vec::new())
    }

    async fn list_peering_connections(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<PeeringConnection>> {
        Ok(Vec::new())
    }

    /// Transit gateways are account-wide.
    async fn list_transit_gateways(&self, _scope: &Scope) -> Result<Vec<TransitGateway>> {
        Ok(Vec::new())
    }

    async fn list_internet_gateways(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<InternetGateway>> {
        Ok(Vec::new())
    }

    async fn list_nat_gateways(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<NatGateway>> {
        Ok(Vec::new())
    }

    async fn list_route_tables(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<RouteTable>> {
        Ok(Vec::new())
    }

    async fn list_security_groups(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<SecurityGroup>> {
        Ok(Vec::new())
    }

    async fn list_network_acls(
        &self,
        _scope: &Scope,
        _vpc_ids: &[String],
    ) -> Result<Vec<NetworkAcl>> {
        Ok(Vec::new())
    }

    /// IAM roles are account-wide.
    async fn list_iam_roles(&self, _scope: &Scope) -> Result<Vec<IamRole>> {
        Ok(Vec::new())
    }
}
