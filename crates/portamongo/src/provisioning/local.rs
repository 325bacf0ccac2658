use async_trait::async_trait;

use portamongo_core::provisioning::{ConnectionFactory, Result, ScaleOutcome};
use portamongo_core::storage::DocumentStore;

use super::ProvisioningStrategy;

/// Self-hosted MongoDB.
///
/// The engine creates a database on its first write, so resolving a handle
/// is all `ensure_database_created` has to do. There is no throughput to manage.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProvisioning;

#[async_trait]
impl<F: ConnectionFactory> ProvisioningStrategy<F> for LocalProvisioning {
    async fn ensure_database_created(&self, factory: &F) -> Result<()> {
        let store = factory.database_handle().await?;
        tracing::debug!(
            database = %store.database_name(),
            "Resolved database handle, creation is deferred to the first write"
        );
        Ok(())
    }

    async fn scale_throughput(&self, _factory: &F) -> Result<ScaleOutcome> {
        Ok(ScaleOutcome::NotManaged)
    }
}
