use async_trait::async_trait;

use super::types::{CollectionResource, DatabaseResource, Offer};
use super::Result;
use crate::config::MongoConfig;
use crate::storage::{self, DocumentStore};

/// Administrative surface of a managed-cloud deployment.
///
/// A client is short-lived: it is opened for a single provisioning or
/// scaling operation and dropped when that operation ends.
#[async_trait]
pub trait AdminClient: Send + Sync {
    /// Creates the database with `throughput` unless it already exists.
    async fn create_database_if_not_exists(&self, database_id: &str, throughput: u32)
        -> Result<()>;

    /// Looks up a database by id.
    async fn find_database(&self, database_id: &str) -> Result<Option<DatabaseResource>>;

    /// Reads the collection feed of a database. `None` when the feed is unavailable.
    async fn list_collections(
        &self,
        database: &DatabaseResource,
    ) -> Result<Option<Vec<CollectionResource>>>;

    /// Finds the offer whose resource is `resource_link`.
    async fn find_offer(&self, resource_link: &str) -> Result<Option<Offer>>;

    /// Replaces `offer` with one carrying `throughput`.
    async fn replace_offer(&self, offer: &Offer, throughput: u32) -> Result<Offer>;
}

/// Produces database handles and administrative clients from a configuration.
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    type Store: DocumentStore;
    type Admin: AdminClient;

    fn config(&self) -> &MongoConfig;

    /// Builds a new data-plane handle for the configured database.
    ///
    /// Internal use only: callers go through the collection service, which
    /// memoizes the handle.
    async fn database_handle(&self) -> storage::Result<Self::Store>;

    /// Opens a fresh administrative client for a single operation.
    async fn open_admin_client(&self) -> Result<Self::Admin>;
}
