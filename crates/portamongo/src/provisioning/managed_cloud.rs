use async_trait::async_trait;

use portamongo_core::provisioning::{
    throughput_for_collections, AdminClient, ConnectionFactory, Result, ScaleOutcome,
};

use super::ProvisioningStrategy;

/// Throughput-provisioned managed service.
///
/// Every operation opens its own administrative client and drops it before
/// returning, whether the operation succeeded or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagedCloudProvisioning;

#[async_trait]
impl<F: ConnectionFactory> ProvisioningStrategy<F> for ManagedCloudProvisioning {
    async fn ensure_database_created(&self, factory: &F) -> Result<()> {
        let config = factory.config();
        let admin = factory.open_admin_client().await?;

        let result = admin
            .create_database_if_not_exists(config.database_name(), config.initial_throughput())
            .await;
        drop(admin);
        result?;

        tracing::info!(
            database = %config.database_name(),
            throughput = config.initial_throughput(),
            "Database is provisioned"
        );
        Ok(())
    }

    async fn scale_throughput(&self, factory: &F) -> Result<ScaleOutcome> {
        let admin = factory.open_admin_client().await?;

        let outcome = scale(&admin, factory.config().database_name()).await;
        drop(admin);
        outcome
    }
}

async fn scale<A: AdminClient>(admin: &A, database_id: &str) -> Result<ScaleOutcome> {
    let database = match admin.find_database(database_id).await? {
        Some(database) => database,
        None => {
            return Ok(ScaleOutcome::DatabaseMissing {
                database: database_id.to_string(),
            })
        }
    };

    let collections = match admin.list_collections(&database).await? {
        Some(collections) if !collections.is_empty() => collections,
        _ => {
            return Ok(ScaleOutcome::NoCollections {
                database: database_id.to_string(),
            })
        }
    };

    let offer = match admin.find_offer(&database.self_link).await? {
        Some(offer) => offer,
        None => {
            return Ok(ScaleOutcome::NoOffer {
                database: database_id.to_string(),
            })
        }
    };

    let target = throughput_for_collections(collections.len());
    admin.replace_offer(&offer, target).await?;

    Ok(ScaleOutcome::Scaled {
        database: database_id.to_string(),
        collection_count: collections.len(),
        previous: offer.throughput(),
        target,
    })
}
