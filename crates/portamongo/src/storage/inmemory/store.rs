//! In-memory document store.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use portamongo_core::storage::{DocumentStore, Result, StorageError};

use super::stall::Stall;

/// A command received by an [`InMemoryStore`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    ListCollections,
    CollectionExists(String),
    Create(String),
    Shard { namespace: String, key: String },
    Drop(String),
}

#[derive(Debug, Default)]
struct StoreState {
    collections: Vec<String>,
    shard_keys: HashMap<String, String>,
    commands: Vec<StoreCommand>,
    sharding_rejection: Option<String>,
    create_failure: Option<String>,
}

/// In-memory storage backend for testing.
///
/// Collections keep their creation order. Clones share state, so a test can
/// keep one clone to inspect what the code under test did with another.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    database: String,
    state: Arc<RwLock<StoreState>>,
    stall: Arc<Stall>,
}

impl InMemoryStore {
    /// Creates an empty store for `database`.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            state: Arc::new(RwLock::new(StoreState::default())),
            stall: Arc::new(Stall::default()),
        }
    }

    /// Adds a collection without recording a command.
    pub async fn insert_collection(&self, name: &str) {
        let mut state = self.state.write().await;
        if !state.collections.iter().any(|c| c == name) {
            state.collections.push(name.to_string());
        }
    }

    /// Makes every shard command fail with `message`, like a deployment
    /// without sharding support.
    pub async fn reject_sharding(&self, message: &str) {
        self.state.write().await.sharding_rejection = Some(message.to_string());
    }

    /// Makes every plain create fail with `message`.
    pub async fn fail_create(&self, message: &str) {
        self.state.write().await.create_failure = Some(message.to_string());
    }

    /// Leaves every later command pending after it is recorded, until the
    /// caller drops it.
    pub fn stall_commands(&self) {
        self.stall.engage();
    }

    /// Waits until a command is held by [`InMemoryStore::stall_commands`].
    pub async fn stalled_command(&self) {
        self.stall.arrival().await;
    }

    /// Commands received so far.
    pub async fn commands(&self) -> Vec<StoreCommand> {
        self.state.read().await.commands.clone()
    }

    /// Current collection names in creation order.
    pub async fn collections(&self) -> Vec<String> {
        self.state.read().await.collections.clone()
    }

    /// Partition key a collection was sharded on, if any.
    pub async fn shard_key(&self, name: &str) -> Option<String> {
        self.state.read().await.shard_keys.get(name).cloned()
    }

    async fn receive(&self, command: StoreCommand) {
        self.state.write().await.commands.push(command);
        self.stall.pass().await;
    }

    fn namespace(&self, name: &str) -> String {
        format!("{}.{}", self.database, name)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    type Collection<T>
        = InMemoryCollection<T>
    where
        T: Send + Sync + 'static;

    fn database_name(&self) -> &str {
        &self.database
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.receive(StoreCommand::ListCollections).await;
        Ok(self.state.read().await.collections.clone())
    }

    async fn collection_exists(&self, name: &str) -> Result<bool> {
        self.receive(StoreCommand::CollectionExists(name.to_string()))
            .await;
        let state = self.state.read().await;
        Ok(state.collections.iter().any(|c| c == name))
    }

    async fn create_collection(&self, name: &str) -> Result<()> {
        self.receive(StoreCommand::Create(name.to_string())).await;
        let mut state = self.state.write().await;

        if let Some(message) = &state.create_failure {
            return Err(StorageError::CommandFailed {
                operation: "create_collection",
                target: self.namespace(name),
                message: message.clone(),
            });
        }
        if state.collections.iter().any(|c| c == name) {
            return Err(StorageError::CommandFailed {
                operation: "create_collection",
                target: self.namespace(name),
                message: "collection already exists".to_string(),
            });
        }

        state.collections.push(name.to_string());
        Ok(())
    }

    async fn shard_collection(&self, namespace: &str, key: &str) -> Result<()> {
        self.receive(StoreCommand::Shard {
            namespace: namespace.to_string(),
            key: key.to_string(),
        })
        .await;
        let mut state = self.state.write().await;

        if let Some(message) = &state.sharding_rejection {
            return Err(StorageError::ShardingUnsupported {
                namespace: namespace.to_string(),
                message: message.clone(),
            });
        }

        let prefix = format!("{}.", self.database);
        let name = namespace
            .strip_prefix(&prefix)
            .ok_or_else(|| StorageError::ShardingUnsupported {
                namespace: namespace.to_string(),
                message: format!("namespace is not in database '{}'", self.database),
            })?
            .to_string();

        if !state.collections.contains(&name) {
            state.collections.push(name.clone());
        }
        state.shard_keys.insert(name, key.to_string());
        Ok(())
    }

    /// Unlike MongoDB, a missing collection is `StorageError::NotFound`.
    async fn drop_collection(&self, name: &str) -> Result<()> {
        self.receive(StoreCommand::Drop(name.to_string())).await;
        let mut state = self.state.write().await;

        let position = state
            .collections
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| StorageError::NotFound {
                database: self.database.clone(),
                collection: name.to_string(),
            })?;
        state.collections.remove(position);
        state.shard_keys.remove(name);
        Ok(())
    }

    fn collection<T>(&self, name: &str) -> Self::Collection<T>
    where
        T: Send + Sync + 'static,
    {
        InMemoryCollection {
            database: self.database.clone(),
            name: name.to_string(),
            _document: PhantomData,
        }
    }
}

/// Typed collection handle returned by [`InMemoryStore`].
#[derive(Debug)]
pub struct InMemoryCollection<T> {
    database: String,
    name: String,
    _document: PhantomData<fn() -> T>,
}

impl<T> InMemoryCollection<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order;

    #[tokio::test]
    async fn test_create_and_list_keep_order() {
        let store = InMemoryStore::new("Shop");

        store.create_collection("Order").await.unwrap();
        store.create_collection("Customer").await.unwrap();

        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["Order".to_string(), "Customer".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_existing_collection_fails() {
        let store = InMemoryStore::new("Shop");
        store.insert_collection("Order").await;

        let result = store.create_collection("Order").await;

        assert!(matches!(
            result,
            Err(StorageError::CommandFailed {
                operation: "create_collection",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_shard_creates_collection_with_key() {
        let store = InMemoryStore::new("Shop");

        store.shard_collection("Shop.Order", "_id").await.unwrap();

        assert!(store.collection_exists("Order").await.unwrap());
        assert_eq!(store.shard_key("Order").await.as_deref(), Some("_id"));
    }

    #[tokio::test]
    async fn test_rejected_sharding_leaves_no_collection() {
        let store = InMemoryStore::new("Shop");
        store.reject_sharding("no such command: 'shardCollection'").await;

        let result = store.shard_collection("Shop.Order", "_id").await;

        assert_eq!(
            result,
            Err(StorageError::ShardingUnsupported {
                namespace: "Shop.Order".to_string(),
                message: "no such command: 'shardCollection'".to_string(),
            })
        );
        assert!(store.collections().await.is_empty());
    }

    #[tokio::test]
    async fn test_drop_missing_collection_is_not_found() {
        let store = InMemoryStore::new("Shop");

        let result = store.drop_collection("Order").await;

        assert_eq!(
            result,
            Err(StorageError::NotFound {
                database: "Shop".to_string(),
                collection: "Order".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_commands_are_recorded_in_order() {
        let store = InMemoryStore::new("Shop");

        store.collection_exists("Order").await.unwrap();
        store.create_collection("Order").await.unwrap();
        store.drop_collection("Order").await.unwrap();

        assert_eq!(
            store.commands().await,
            vec![
                StoreCommand::CollectionExists("Order".to_string()),
                StoreCommand::Create("Order".to_string()),
                StoreCommand::Drop("Order".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_stalled_command_is_recorded_before_it_hangs() {
        let store = InMemoryStore::new("Shop");
        store.stall_commands();

        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            store.create_collection("Order"),
        )
        .await;

        assert!(pending.is_err());
        assert_eq!(
            store.commands().await,
            vec![StoreCommand::Create("Order".to_string())]
        );
        assert!(store.collections().await.is_empty());
    }

    #[tokio::test]
    async fn test_collection_handle_does_not_issue_commands() {
        let store = InMemoryStore::new("Shop");

        let orders = store.collection::<Order>("Order");

        assert_eq!(orders.name(), "Order");
        assert_eq!(orders.namespace(), "Shop.Order");
        assert!(store.commands().await.is_empty());
    }
}
