//! Connection factory backed by the MongoDB driver and the Cosmos DB REST client.

use async_trait::async_trait;
use mongodb::Client;

use portamongo_core::config::MongoConfig;
use portamongo_core::connection::ClientSettings;
use portamongo_core::provisioning::{ConnectionFactory, Result};
use portamongo_core::storage::{self, StorageError};

use crate::admin::CosmosAdminClient;
use crate::storage::mongo::client_options;
use crate::storage::MongoStore;

/// Production [`ConnectionFactory`].
///
/// Each `database_handle` call builds a fresh driver client. Callers are
/// expected to memoize the handle, as the collection service does.
#[derive(Debug, Clone)]
pub struct MongoConnectionFactory {
    config: MongoConfig,
}

impl MongoConnectionFactory {
    pub fn new(config: MongoConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConnectionFactory for MongoConnectionFactory {
    type Store = MongoStore;
    type Admin = CosmosAdminClient;

    fn config(&self) -> &MongoConfig {
        &self.config
    }

    async fn database_handle(&self) -> storage::Result<MongoStore> {
        let settings = ClientSettings::from_config(&self.config)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let options = client_options(&settings).await?;

        let client = Client::with_options(options)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        tracing::debug!(database = %settings.database_name, "Built database handle");
        Ok(MongoStore::new(client.database(&settings.database_name)))
    }

    async fn open_admin_client(&self) -> Result<CosmosAdminClient> {
        CosmosAdminClient::from_config(&self.config)
    }
}
