use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use portamongo_core::collection::{CollectionCreation, CollectionDescriptor};
use portamongo_core::provisioning::ConnectionFactory;
use portamongo_core::storage::{DocumentStore, Result, StorageError};

use crate::cancel::run_cancellable;

/// Typed collection handle of the factory's store.
pub type CollectionHandle<F, T> =
    <<F as ConnectionFactory>::Store as DocumentStore>::Collection<T>;

/// Collection management for the configured database.
///
/// The database handle is built on first use and shared by every later
/// call. Concurrent first calls still build it only once.
pub struct CollectionService<F: ConnectionFactory> {
    factory: Arc<F>,
    store: OnceCell<F::Store>,
    cancellation: CancellationToken,
}

impl<F: ConnectionFactory> CollectionService<F> {
    pub fn new(factory: Arc<F>) -> Self {
        Self {
            factory,
            store: OnceCell::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Aborts in-flight calls once `token` is cancelled.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            cancellation: token,
            ..self
        }
    }

    pub fn database_name(&self) -> &str {
        self.factory.config().database_name()
    }

    async fn store(&self) -> Result<&F::Store> {
        self.store
            .get_or_try_init(|| self.factory.database_handle())
            .await
    }

    async fn cancellable<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        run_cancellable(&self.cancellation, future, || {
            StorageError::Cancelled(operation)
        })
        .await
    }

    /// Returns true if the database holds at least one collection.
    pub async fn any_collection_exists(&self) -> Result<bool> {
        let names = self.list_collection_names().await?;
        Ok(!names.is_empty())
    }

    /// Collection names in the order the engine returns them.
    pub async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.cancellable("list_collection_names", async {
            self.store().await?.list_collection_names().await
        })
        .await
    }

    pub async fn drop_collection(&self, name: &str) -> Result<()> {
        self.cancellable("drop_collection", async {
            self.store().await?.drop_collection(name).await?;
            tracing::info!(
                database = %self.database_name(),
                collection = %name,
                "Dropped collection"
            );
            Ok(())
        })
        .await
    }

    /// Checks for the collection named after `T`.
    pub async fn collection_exists<T: ?Sized>(&self) -> Result<bool> {
        let descriptor = CollectionDescriptor::of::<T>();
        self.cancellable("collection_exists", async {
            self.store()
                .await?
                .collection_exists(descriptor.name())
                .await
        })
        .await
    }

    /// Creates the collection named after `T` unless it already exists.
    ///
    /// The collection is first created through the shard command with a
    /// hashed `_id` key. If that fails for any reason, one plain creation is
    /// attempted; its failure is what the caller sees.
    pub async fn create_collection<T: ?Sized>(&self) -> Result<CollectionCreation> {
        let descriptor = CollectionDescriptor::of::<T>();
        self.cancellable("create_collection", async {
            let store = self.store().await?;
            let name = descriptor.name();

            if store.collection_exists(name).await? {
                tracing::debug!(
                    database = %store.database_name(),
                    collection = %name,
                    "Collection already exists"
                );
                return Ok(CollectionCreation::AlreadyExists);
            }

            let namespace = descriptor.namespace(store.database_name());
            match store
                .shard_collection(&namespace, descriptor.partition_key())
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        database = %store.database_name(),
                        collection = %name,
                        partition_key = descriptor.partition_key(),
                        "Created sharded collection"
                    );
                    Ok(CollectionCreation::Sharded)
                }
                Err(err) => {
                    tracing::warn!(
                        database = %store.database_name(),
                        collection = %name,
                        error = %err,
                        "Unable to create a sharded collection, creating it without a partition key"
                    );
                    store
                        .create_collection(name)
                        .await
                        .map_err(|e| as_command_failure(e, &namespace))?;
                    tracing::info!(
                        database = %store.database_name(),
                        collection = %name,
                        "Created collection"
                    );
                    Ok(CollectionCreation::Unsharded)
                }
            }
        })
        .await
    }

    /// Typed handle to the collection named after `T`, or `None` when it
    /// does not exist.
    pub async fn get_collection<T>(&self) -> Result<Option<CollectionHandle<F, T>>>
    where
        T: Send + Sync + 'static,
    {
        let descriptor = CollectionDescriptor::of::<T>();
        self.cancellable("get_collection", async {
            let store = self.store().await?;
            if !store.collection_exists(descriptor.name()).await? {
                return Ok(None);
            }
            Ok(Some(store.collection::<T>(descriptor.name())))
        })
        .await
    }
}

fn as_command_failure(err: StorageError, namespace: &str) -> StorageError {
    match err {
        err @ StorageError::CommandFailed { .. } => err,
        other => StorageError::CommandFailed {
            operation: "create_collection",
            target: namespace.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use portamongo_core::config::{DeploymentLocation, MongoConfig};

    use crate::storage::inmemory::{InMemoryFactory, StoreCommand};

    struct Order;
    struct Customer;

    fn factory() -> Arc<InMemoryFactory> {
        InMemoryFactory::shared(
            MongoConfig::new("Shop", DeploymentLocation::Local, "mongodb://localhost:27017")
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_collection_shards_on_identity() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        let creation = service.create_collection::<Order>().await.unwrap();

        assert_eq!(creation, CollectionCreation::Sharded);
        assert_eq!(
            factory.store().commands().await,
            vec![
                StoreCommand::CollectionExists("Order".to_string()),
                StoreCommand::Shard {
                    namespace: "Shop.Order".to_string(),
                    key: "_id".to_string(),
                },
            ]
        );
        assert_eq!(factory.store().shard_key("Order").await.as_deref(), Some("_id"));
    }

    #[tokio::test]
    async fn test_create_collection_is_idempotent() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        service.create_collection::<Order>().await.unwrap();
        let second = service.create_collection::<Order>().await.unwrap();

        assert_eq!(second, CollectionCreation::AlreadyExists);
        assert_eq!(factory.store().collections().await, vec!["Order".to_string()]);
        let shards = factory
            .store()
            .commands()
            .await
            .into_iter()
            .filter(|command| matches!(command, StoreCommand::Shard { .. }))
            .count();
        assert_eq!(shards, 1);
    }

    #[tokio::test]
    async fn test_rejected_sharding_falls_back_once() {
        let factory = factory();
        factory
            .store()
            .reject_sharding("no such command: 'shardCollection'")
            .await;
        let service = CollectionService::new(factory.clone());

        let creation = service.create_collection::<Order>().await.unwrap();

        assert_eq!(creation, CollectionCreation::Unsharded);
        assert_eq!(
            factory.store().commands().await,
            vec![
                StoreCommand::CollectionExists("Order".to_string()),
                StoreCommand::Shard {
                    namespace: "Shop.Order".to_string(),
                    key: "_id".to_string(),
                },
                StoreCommand::Create("Order".to_string()),
            ]
        );
        assert!(service.collection_exists::<Order>().await.unwrap());
        assert_eq!(factory.store().shard_key("Order").await, None);
    }

    #[tokio::test]
    async fn test_fallback_failure_is_a_command_failure() {
        let factory = factory();
        factory.store().reject_sharding("not supported").await;
        factory.store().fail_create("not authorized").await;
        let service = CollectionService::new(factory.clone());

        let result = service.create_collection::<Order>().await;

        assert_eq!(
            result,
            Err(StorageError::CommandFailed {
                operation: "create_collection",
                target: "Shop.Order".to_string(),
                message: "not authorized".to_string(),
            })
        );
    }

    #[test]
    fn test_non_command_fallback_errors_are_wrapped() {
        let err = as_command_failure(
            StorageError::ConnectionFailed("connection reset".to_string()),
            "Shop.Order",
        );

        assert_eq!(
            err,
            StorageError::CommandFailed {
                operation: "create_collection",
                target: "Shop.Order".to_string(),
                message: "Connection failed: connection reset".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_get_collection_requires_existing_collection() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        assert!(service.get_collection::<Order>().await.unwrap().is_none());

        service.create_collection::<Order>().await.unwrap();
        let orders = service.get_collection::<Order>().await.unwrap().unwrap();

        assert_eq!(orders.name(), "Order");
        assert_eq!(orders.namespace(), "Shop.Order");
    }

    #[tokio::test]
    async fn test_list_and_any_collection_exists() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        assert!(!service.any_collection_exists().await.unwrap());

        service.create_collection::<Order>().await.unwrap();
        service.create_collection::<Customer>().await.unwrap();

        assert!(service.any_collection_exists().await.unwrap());
        assert_eq!(
            service.list_collection_names().await.unwrap(),
            vec!["Order".to_string(), "Customer".to_string()]
        );
    }

    #[tokio::test]
    async fn test_drop_collection() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());
        service.create_collection::<Order>().await.unwrap();

        service.drop_collection("Order").await.unwrap();

        assert!(!service.collection_exists::<Order>().await.unwrap());
        assert_eq!(
            service.drop_collection("Order").await,
            Err(StorageError::NotFound {
                database: "Shop".to_string(),
                collection: "Order".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_handle_is_built_once() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        service.create_collection::<Order>().await.unwrap();
        service.create_collection::<Customer>().await.unwrap();
        service.list_collection_names().await.unwrap();
        service.get_collection::<Order>().await.unwrap();

        assert_eq!(factory.handles_built(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_builds_one_handle() {
        let factory = factory();
        let service = CollectionService::new(factory.clone());

        let (first, second, third) = tokio::join!(
            service.list_collection_names(),
            service.collection_exists::<Order>(),
            service.any_collection_exists(),
        );

        assert!(first.is_ok() && second.is_ok() && third.is_ok());
        assert_eq!(factory.handles_built(), 1);
    }

    #[tokio::test]
    async fn test_connection_failure_surfaces() {
        let factory = factory();
        factory.fail_connections("server selection timeout");
        let service = CollectionService::new(factory.clone());

        let result = service.list_collection_names().await;

        assert_eq!(
            result,
            Err(StorageError::ConnectionFailed(
                "server selection timeout".to_string()
            ))
        );
        assert_eq!(factory.handles_built(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_aborts_calls() {
        let factory = factory();
        let token = CancellationToken::new();
        let service = CollectionService::new(factory.clone()).with_cancellation(token.clone());
        token.cancel();

        let result = service.create_collection::<Order>().await;

        assert_eq!(result, Err(StorageError::Cancelled("create_collection")));
        assert!(factory.store().commands().await.is_empty());
        assert_eq!(factory.handles_built(), 0);
    }

    #[tokio::test]
    async fn test_cancelling_aborts_pending_store_command() {
        let factory = factory();
        factory.store().stall_commands();
        let token = CancellationToken::new();
        let service = CollectionService::new(factory.clone()).with_cancellation(token.clone());

        let (result, ()) = tokio::join!(service.create_collection::<Order>(), async {
            factory.store().stalled_command().await;
            token.cancel();
        });

        assert_eq!(result, Err(StorageError::Cancelled("create_collection")));
        assert_eq!(
            factory.store().commands().await,
            vec![StoreCommand::CollectionExists("Order".to_string())]
        );
        assert!(factory.store().collections().await.is_empty());
    }
}
