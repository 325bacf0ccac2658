//! MongoDB document store.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use portamongo_core::collection::HASHED;
use portamongo_core::storage::{DocumentStore, Result};

use super::error::{map_command_error, map_shard_error};

/// [`DocumentStore`] backed by the official MongoDB driver.
///
/// Cheap to clone; clones share the driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// The underlying driver handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn namespace(&self, collection: &str) -> String {
        format!("{}.{}", self.database.name(), collection)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    type Collection<T>
        = Collection<T>
    where
        T: Send + Sync + 'static;

    fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.database
            .list_collection_names()
            .await
            .map_err(|e| map_command_error(e, "list_collection_names", self.database.name()))
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        let names = self
            .database
            .list_collection_names()
            .filter(doc! { "name": name })
            .await
            .map_err(|e| map_command_error(e, "collection_exists", &self.namespace(name)))?;

        Ok(!names.is_empty())
    }

    async fn create_collection(&self, name: &str) -> Result<()> {
        self.database
            .create_collection(name)
            .await
            .map_err(|e| map_command_error(e, "create_collection", &self.namespace(name)))
    }

    async fn shard_collection(&self, namespace: &str, key: &str) -> Result<()> {
        let mut shard_key = Document::new();
        shard_key.insert(key, HASHED);

        self.database
            .run_command(doc! {
                "shardCollection": namespace,
                "key": shard_key,
            })
            .await
            .map_err(|e| map_shard_error(e, namespace))?;

        Ok(())
    }

    /// Dropping a missing collection succeeds: the driver swallows the
    /// server's `NamespaceNotFound` reply, so `StorageError::NotFound` is
    /// never returned here.
    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.database
            .collection::<Document>(name)
            .drop()
            .await
            .map_err(|e| map_command_error(e, "drop_collection", &self.namespace(name)))
    }

    fn collection<T>(&self, name: &str) -> Self::Collection<T>
    where
        T: Send + Sync + 'static,
    {
        self.database.collection::<T>(name)
    }
}
