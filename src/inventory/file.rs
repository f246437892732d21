//! Provider backed by a JSON inventory document.

use super::{InMemoryInventory, InventoryProvider};
use crate::error::{InventoryErrorKind, NetDriftError, Result};
use crate::model::{
    IamRole, InternetGateway, NatGateway, NetworkAcl, PeeringConnection, RawInventory, RouteTable,
    Scope, SecurityGroup, Subnet, TransitGateway, Vpc,
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reads a [`RawInventory`] document from disk once per acquisition.
///
/// The document has one array per collection; a persisted snapshot also
/// loads since its `scope` and `scan_time` keys are ignored. Listing VPCs,
/// the first step of every acquisition, re-reads the file; the remaining
/// collections are served from that copy. A watch session therefore sees
/// edits between cycles, and never a mix of two versions within one.
#[derive(Debug)]
pub struct FileInventoryProvider {
    path: PathBuf,
    name: String,
    loaded: Mutex<Option<Arc<InMemoryInventory>>>,
}

impl FileInventoryProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self {
            path,
            name,
            loaded: Mutex::new(None),
        }
    }

    /// Read the document and make it the copy later listings use.
    async fn reload(&self) -> Result<Arc<InMemoryInventory>> {
        let inventory = Arc::new(self.load().await?);
        *self.loaded.lock().await = Some(Arc::clone(&inventory));
        Ok(inventory)
    }

    /// The copy read by the last VPC listing, reading it if none exists yet.
    async fn current(&self) -> Result<Arc<InMemoryInventory>> {
        let mut loaded = self.loaded.lock().await;
        if let Some(inventory) = loaded.as_ref() {
            return Ok(Arc::clone(inventory));
        }
        let inventory = Arc::new(self.load().await?);
        *loaded = Some(Arc::clone(&inventory));
        Ok(inventory)
    }

    async fn load(&self) -> Result<InMemoryInventory> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            NetDriftError::inventory(
                format!("reading {}", self.path.display()),
                InventoryErrorKind::Unavailable(e.to_string()),
            )
        })?;

        let raw: RawInventory = serde_json::from_str(&content).map_err(|e| {
            NetDriftError::inventory(
                format!("parsing {}", self.path.display()),
                InventoryErrorKind::InvalidDocument(e.to_string()),
            )
        })?;

        Ok(InMemoryInventory::new(raw))
    }
}

#[async_trait]
impl InventoryProvider for FileInventoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_vpcs(&self, scope: &Scope) -> Result<Vec<Vpc>> {
        self.reload().await?.list_vpcs(scope).await
    }

    async fn list_subnets(&self, scope: &Scope, vpc_ids: &[String]) -> Result<Vec<Subnet>> {
        self.current().await?.list_subnets(scope, vpc_ids).await
    }

    async fn list_peering_connections(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<PeeringConnection>> {
        self.current()
            .await?
            .list_peering_connections(scope, vpc_ids)
            .await
    }

    async fn list_transit_gateways(&self, scope: &Scope) -> Result<Vec<TransitGateway>> {
        self.current().await?.list_transit_gateways(scope).await
    }

    async fn list_internet_gateways(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<InternetGateway>> {
        self.current()
            .await?
            .list_internet_gateways(scope, vpc_ids)
            .await
    }

    async fn list_nat_gateways(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<NatGateway>> {
        self.current().await?.list_nat_gateways(scope, vpc_ids).await
    }

    async fn list_route_tables(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<RouteTable>> {
        self.current().await?.list_route_tables(scope, vpc_ids).await
    }

    async fn list_security_groups(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<SecurityGroup>> {
        self.current().await?.list_security_groups(scope, vpc_ids).await
    }

    async fn list_network_acls(
        &self,
        scope: &Scope,
        vpc_ids: &[String],
    ) -> Result<Vec<NetworkAcl>> {
        self.current().await?.list_network_acls(scope, vpc_ids).await
    }

    async fn list_iam_roles(&self, scope: &Scope) -> Result<Vec<IamRole>> {
        self.current().await?.list_iam_roles(scope).await
    }
}
