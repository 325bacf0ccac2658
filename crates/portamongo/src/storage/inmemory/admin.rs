//! In-memory administrative backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use portamongo_core::provisioning::{
    AdminClient, CollectionResource, DatabaseResource, Offer, OfferContent, ProvisioningError,
    Result,
};
use portamongo_core::storage::DocumentStore;

use super::stall::Stall;
use super::InMemoryStore;

/// A call received by an [`InMemoryAdmin`] session, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCall {
    CreateDatabase { database: String, throughput: u32 },
    FindDatabase(String),
    ListCollections(String),
    FindOffer(String),
    ReplaceOffer { offer: String, throughput: u32 },
}

#[derive(Debug, Default)]
struct AdminState {
    databases: HashMap<String, DatabaseResource>,
    offers: Vec<Offer>,
    calls: Vec<AdminCall>,
    feed_unavailable: bool,
    failure: Option<String>,
}

#[derive(Debug, Default)]
struct SessionCounters {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// In-memory stand-in for the managed-cloud administrative endpoint.
///
/// Collection feeds are served from the attached [`InMemoryStore`], so
/// collections created through the data plane show up in listings.
#[derive(Debug, Clone)]
pub struct InMemoryAdmin {
    store: InMemoryStore,
    state: Arc<RwLock<AdminState>>,
    sessions: Arc<SessionCounters>,
    stall: Arc<Stall>,
}

impl InMemoryAdmin {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(AdminState::default())),
            sessions: Arc::new(SessionCounters::default()),
            stall: Arc::new(Stall::default()),
        }
    }

    /// Opens a client session. The session counts as closed when dropped.
    pub fn open_session(&self) -> InMemoryAdminSession {
        self.sessions.opened.fetch_add(1, Ordering::SeqCst);
        InMemoryAdminSession {
            backend: self.clone(),
        }
    }

    /// Registers a database without recording a call.
    ///
    /// `throughput` of `None` leaves the database without an offer.
    pub async fn insert_database(&self, id: &str, throughput: Option<u32>) -> DatabaseResource {
        let mut state = self.state.write().await;
        let database = new_database(id);
        if let Some(throughput) = throughput {
            state.offers.push(new_offer(&database, throughput));
        }
        state.databases.insert(id.to_string(), database.clone());
        database
    }

    /// Makes collection feeds unavailable.
    pub async fn hide_collection_feed(&self) {
        self.state.write().await.feed_unavailable = true;
    }

    /// Makes every call fail with a request error carrying `message`.
    pub async fn fail_requests(&self, message: &str) {
        self.state.write().await.failure = Some(message.to_string());
    }

    /// Leaves every later call pending after it is recorded, until the
    /// caller drops it.
    pub fn stall_requests(&self) {
        self.stall.engage();
    }

    /// Waits until a call is held by [`InMemoryAdmin::stall_requests`].
    pub async fn stalled_request(&self) {
        self.stall.arrival().await;
    }

    /// Calls received so far, across all sessions.
    pub async fn calls(&self) -> Vec<AdminCall> {
        self.state.read().await.calls.clone()
    }

    pub async fn database(&self, id: &str) -> Option<DatabaseResource> {
        self.state.read().await.databases.get(id).cloned()
    }

    /// Current throughput of the offer attached to database `id`.
    pub async fn offer_throughput(&self, id: &str) -> Option<u32> {
        let state = self.state.read().await;
        let database = state.databases.get(id)?;
        state
            .offers
            .iter()
            .find(|offer| offer.resource == database.self_link)
            .map(Offer::throughput)
    }

    pub fn sessions_opened(&self) -> usize {
        self.sessions.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.sessions.closed.load(Ordering::SeqCst)
    }

    async fn record(&self, call: AdminCall, operation: &'static str) -> Result<()> {
        let mut state = self.state.write().await;
        let database = match &call {
            AdminCall::CreateDatabase { database, .. }
            | AdminCall::FindDatabase(database)
            | AdminCall::ListCollections(database) => database.clone(),
            AdminCall::FindOffer(_) | AdminCall::ReplaceOffer { .. } => {
                self.store_database().to_string()
            }
        };
        state.calls.push(call);
        let failure = state.failure.clone();
        drop(state);

        self.stall.pass().await;
        match failure {
            Some(message) => Err(ProvisioningError::Request {
                operation,
                database,
                message,
            }),
            None => Ok(()),
        }
    }

    fn store_database(&self) -> &str {
        self.store.database_name()
    }
}

/// An open administrative session on an [`InMemoryAdmin`].
#[derive(Debug)]
pub struct InMemoryAdminSession {
    backend: InMemoryAdmin,
}

impl Drop for InMemoryAdminSession {
    fn drop(&mut self) {
        self.backend.sessions.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AdminClient for InMemoryAdminSession {
    async fn create_database_if_not_exists(
        &self,
        database_id: &str,
        throughput: u32,
    ) -> Result<()> {
        let backend = &self.backend;
        backend
            .record(
                AdminCall::CreateDatabase {
                    database: database_id.to_string(),
                    throughput,
                },
                "create_database",
            )
            .await?;

        let mut state = backend.state.write().await;
        if !state.databases.contains_key(database_id) {
            let database = new_database(database_id);
            state.offers.push(new_offer(&database, throughput));
            state.databases.insert(database_id.to_string(), database);
        }
        Ok(())
    }

    async fn find_database(&self, database_id: &str) -> Result<Option<DatabaseResource>> {
        let backend = &self.backend;
        backend
            .record(
                AdminCall::FindDatabase(database_id.to_string()),
                "find_database",
            )
            .await?;

        Ok(backend.state.read().await.databases.get(database_id).cloned())
    }

    async fn list_collections(
        &self,
        database: &DatabaseResource,
    ) -> Result<Option<Vec<CollectionResource>>> {
        let backend = &self.backend;
        backend
            .record(
                AdminCall::ListCollections(database.id.clone()),
                "list_collections",
            )
            .await?;

        {
            let state = backend.state.read().await;
            if state.feed_unavailable || !state.databases.contains_key(&database.id) {
                return Ok(None);
            }
        }

        if database.id != backend.store_database() {
            return Ok(Some(Vec::new()));
        }

        let collections = backend
            .store
            .collections()
            .await
            .into_iter()
            .map(|id| CollectionResource {
                self_link: format!("{}colls/{}/", database.self_link, id),
                rid: String::new(),
                id,
            })
            .collect();
        Ok(Some(collections))
    }

    async fn find_offer(&self, resource_link: &str) -> Result<Option<Offer>> {
        let backend = &self.backend;
        backend
            .record(AdminCall::FindOffer(resource_link.to_string()), "find_offer")
            .await?;

        let state = backend.state.read().await;
        Ok(state
            .offers
            .iter()
            .find(|offer| offer.resource == resource_link)
            .cloned())
    }

    async fn replace_offer(&self, offer: &Offer, throughput: u32) -> Result<Offer> {
        let backend = &self.backend;
        backend
            .record(
                AdminCall::ReplaceOffer {
                    offer: offer.rid.clone(),
                    throughput,
                },
                "replace_offer",
            )
            .await?;

        let mut state = backend.state.write().await;
        let existing = state
            .offers
            .iter_mut()
            .find(|existing| existing.rid == offer.rid)
            .ok_or_else(|| ProvisioningError::Request {
                operation: "replace_offer",
                database: backend.store_database().to_string(),
                message: format!("offer '{}' not found", offer.rid),
            })?;

        *existing = offer.with_throughput(throughput);
        Ok(existing.clone())
    }
}

fn short_rid() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn new_database(id: &str) -> DatabaseResource {
    let rid = short_rid();
    DatabaseResource {
        id: id.to_string(),
        self_link: format!("dbs/{rid}/"),
        rid,
    }
}

fn new_offer(database: &DatabaseResource, throughput: u32) -> Offer {
    let rid = short_rid();
    Offer {
        id: rid.clone(),
        self_link: format!("offers/{rid}/"),
        rid,
        resource: database.self_link.clone(),
        offer_resource_id: database.rid.clone(),
        offer_version: "V2".to_string(),
        offer_type: "Invalid".to_string(),
        content: OfferContent {
            offer_throughput: throughput,
        },
    }
}
