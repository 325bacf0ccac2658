use async_trait::async_trait;

use portamongo_core::config::DeploymentLocation;
use portamongo_core::provisioning::{ConnectionFactory, Result, ScaleOutcome};

use super::local::LocalProvisioning;
use super::managed_cloud::ManagedCloudProvisioning;

/// Location-specific provisioning behavior.
#[async_trait]
pub trait ProvisioningStrategy<F: ConnectionFactory>: Send + Sync {
    /// Makes sure the configured database exists.
    async fn ensure_database_created(&self, factory: &F) -> Result<()>;

    /// Adjusts provisioned throughput to the current collection count.
    async fn scale_throughput(&self, factory: &F) -> Result<ScaleOutcome>;
}

/// Picks the strategy for `location`. The only place that branches on it.
pub fn strategy_for<F>(location: DeploymentLocation) -> Box<dyn ProvisioningStrategy<F>>
where
    F: ConnectionFactory + 'static,
{
    match location {
        DeploymentLocation::Local => Box::new(LocalProvisioning),
        DeploymentLocation::ManagedCloud => Box::new(ManagedCloudProvisioning),
    }
}
