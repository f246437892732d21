//! Provider over an in-memory inventory.

use super::InventoryProvider;
use crate::error::Result;
use crate::model::{
    IamRole, InternetGateway, NatGateway, NetworkAcl, PeeringConnection, RawInventory, RouteTable,
    Scope, SecurityGroup, Subnet, TransitGateway, Vpc,
};
use async_trait::async_trait;

/// Serves listings from a fixed [`RawInventory`], applying the scope filter.
///
/// Without a VPC filter every record is returned. With one, only the named
/// VPC is listed and vpc-bound collections keep the records that reference
/// it. Peering connections match on either side. Transit gateways and IAM
/// roles are account-wide and never filtered.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventory {
    inventory: RawInventory,
}

impl InMemoryInventory {
    pub fn new(inventory: RawInventory) -> Self {
        Self { inventory }
    }

    fn filtered_vpcs(&self, scope: &Scope) -> Vec<Vpc> {
        match &scope.vpc_id {
            Some(id) => self
                .inventory
                .vpcs
                .iter()
                .filter(|v| v.id == *id)
                .cloned()
                .collect(),
            None => self.inventory.vpcs.clone(),
        }
    }
}

impl From<RawInventory> for InMemoryInventory {
    fn from(inventory: RawInventory) -> Self {
        Self::new(inventory)
    }
}

/// Keep records whose `vpc_id` is listed, unless the scope is region-wide.
fn in_scope<'a, T: Clone + 'a>(
    items: impl IntoIterator<Item = &'a T>,
    scope: &Scope,
    vpc_ids: &[String],
    vpc_of: impl Fn(&T) -> &str,
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| scope.vpc_id.is_none() || vpc_ids.iter().any(|id| id == vpc_of(item)))
        .cloned()
        .collect()
}

#[async_trait]
impl InventoryProvider for InMemoryInventory {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list_vpcs(&self, scope: &Scope) -> Result<Vec<Vpc>> {
        Ok(self.filtered_vpcs(scope))
    }

    async fn list_subnets(&self, scope: &Scope, vpc_ids: &[String]) -> Result<Vec<Subnet>> {
        Ok(in_scope(&self.inventory.subnets, scope, vpc_ids, |s| {
            s.vpc_id.as_str()
        }))
    }

    async fn list_peering_connections(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<PeeringConnection>> {
        Ok(self
            .inventory
            .peering_connections
            .iter()
            .filter(|p| scope.vpc_id.is_none() || vpc_ids.iter().any(|id| p.touches(id)))
            .cloned()
            .collect())
    }

    async fn list_transit_gateways(&self, _scope: &Scope) -> Result<Vec<TransitGateway>> {
        Ok(self.inventory.transit_gateways.clone())
    }

    async fn list_internet_gateways(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<InternetGateway>> {
        Ok(in_scope(
            &self.inventory.internet_gateways,
            scope,
            vpc_ids,
            |g| g.vpc_id.as_str(),
        ))
    }

    async fn list_nat_gateways(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<NatGateway>> {
        Ok(in_scope(&self.inventory.nat_gateways, scope, vpc_ids, |g| {
            g.vpc_id.as_str()
        }))
    }

    async fn list_route_tables(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<RouteTable>> {
        Ok(in_scope(&self.inventory.route_tables, scope, vpc_ids, |t| {
            t.vpc_id.as_str()
        }))
    }

    async fn list_security_groups(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<SecurityGroup>> {
        Ok(in_scope(&self.inventory.security_groups, scope, vpc_ids, |g| {
            g.vpc_id.as_str()
        }))
    }

    async fn list_network_acls(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<NetworkAcl>> {
        Ok(in_scope(&self.inventory.network_acls, scope, vpc_ids, |a| {
            a.vpc_id.as_str()
        }))
    }

    async fn list_iam_roles(&self, _scope: &Scope) -> Result<Vec<IamRole>> {
        Ok(self.inventory.iam_roles.clone())
    }
}
