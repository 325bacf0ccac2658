use async_trait::async_trait;

use super::Result;

/// Data-plane handle over a single database.
///
/// Implementations wrap whatever driver talks to the engine. Every method is
/// location independent: the same commands are issued to a self-hosted
/// deployment and to a managed one.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Typed collection handle handed to callers for document CRUD.
    type Collection<T>: Send + Sync
    where
        T: Send + Sync + 'static;

    /// Name of the database this handle is bound to.
    fn database_name(&self) -> &str;

    /// Lists collection names in the order the engine returns them.
    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Checks for a collection using an exact-name filter.
    async fn collection_exists(&self, name: &str) -> Result<bool>;

    /// Creates a plain, unsharded collection.
    async fn create_collection(&self, name: &str) -> Result<()>;

    /// Issues the shard command for `namespace` (`database.collection`) with a
    /// single hashed key.
    ///
    /// Fails with `StorageError::ShardingUnsupported` when the deployment
    /// rejects the command for any reason.
    async fn shard_collection(&self, namespace: &str, key: &str) -> Result<()>;

    /// Drops a collection.
    async fn drop_collection(&self, name: &str) -> Result<()>;

    /// Returns a typed handle bound to `name`. Does not touch the network.
    fn collection<T>(&self, name: &str) -> Self::Collection<T>
    where
        T: Send + Sync + 'static;
}
