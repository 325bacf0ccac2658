//! In-memory connection factory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use portamongo_core::config::MongoConfig;
use portamongo_core::provisioning::{ConnectionFactory, Result};
use portamongo_core::storage::{self, StorageError};

use super::{InMemoryAdmin, InMemoryAdminSession, InMemoryStore};

/// [`ConnectionFactory`] wired to in-memory backends.
///
/// Every handle shares one [`InMemoryStore`] and every admin session shares
/// one [`InMemoryAdmin`], so tests can inspect both after the fact.
#[derive(Debug)]
pub struct InMemoryFactory {
    config: MongoConfig,
    store: InMemoryStore,
    admin: InMemoryAdmin,
    handles_built: AtomicUsize,
    connection_failure: Mutex<Option<String>>,
}

impl InMemoryFactory {
    pub fn new(config: MongoConfig) -> Self {
        let store = InMemoryStore::new(config.database_name());
        let admin = InMemoryAdmin::new(store.clone());
        Self {
            config,
            store,
            admin,
            handles_built: AtomicUsize::new(0),
            connection_failure: Mutex::new(None),
        }
    }

    /// Convenience constructor for shared use across services.
    pub fn shared(config: MongoConfig) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    pub fn admin(&self) -> &InMemoryAdmin {
        &self.admin
    }

    /// Number of data-plane handles built so far.
    pub fn handles_built(&self) -> usize {
        self.handles_built.load(Ordering::SeqCst)
    }

    /// Makes handle construction fail with `message`, like an unreachable server.
    pub fn fail_connections(&self, message: &str) {
        if let Ok(mut failure) = self.connection_failure.lock() {
            *failure = Some(message.to_string());
        }
    }
}

#[async_trait]
impl ConnectionFactory for InMemoryFactory {
    type Store = InMemoryStore;
    type Admin = InMemoryAdminSession;

    fn config(&self) -> &MongoConfig {
        &self.config
    }

    async fn database_handle(&self) -> storage::Result<InMemoryStore> {
        let failure = self
            .connection_failure
            .lock()
            .ok()
            .and_then(|failure| failure.clone());
        if let Some(message) = failure {
            return Err(StorageError::ConnectionFailed(message));
        }

        self.handles_built.fetch_add(1, Ordering::SeqCst);
        Ok(self.store.clone())
    }

    async fn open_admin_client(&self) -> Result<InMemoryAdminSession> {
        Ok(self.admin.open_session())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portamongo_core::config::DeploymentLocation;
    use portamongo_core::storage::DocumentStore;

    fn factory() -> InMemoryFactory {
        let config =
            MongoConfig::new("Shop", DeploymentLocation::Local, "mongodb://localhost:27017")
                .unwrap();
        InMemoryFactory::new(config)
    }

    #[tokio::test]
    async fn test_handles_share_one_store() {
        let factory = factory();

        let first = factory.database_handle().await.unwrap();
        let second = factory.database_handle().await.unwrap();
        first.create_collection("Order").await.unwrap();

        assert!(second.collection_exists("Order").await.unwrap());
        assert_eq!(factory.handles_built(), 2);
    }

    #[tokio::test]
    async fn test_connection_failure_is_reported() {
        let factory = factory();
        factory.fail_connections("server selection timeout");

        let result = factory.database_handle().await;

        assert_eq!(
            result.err(),
            Some(StorageError::ConnectionFailed(
                "server selection timeout".to_string()
            ))
        );
        assert_eq!(factory.handles_built(), 0);
    }

    #[tokio::test]
    async fn test_admin_sessions_are_counted() {
        let factory = factory();

        let session = factory.open_admin_client().await.unwrap();
        drop(session);

        assert_eq!(factory.admin().sessions_opened(), 1);
        assert_eq!(factory.admin().sessions_closed(), 1);
    }
}
