//! In-memory storage and administrative backends for testing.
//!
//! Every type here shares its state through `Arc<RwLock<_>>`, so a test can
//! hand one clone to the code under test and inspect another afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use portamongo::storage::inmemory::InMemoryFactory;
//!
//! let factory = InMemoryFactory::shared(config);
//! // Hand the factory to a service, then inspect factory.store()...
//! ```

mod admin;
mod factory;
mod stall;
mod store;

pub use admin::{AdminCall, InMemoryAdmin, InMemoryAdminSession};
pub use factory::InMemoryFactory;
pub use store::{InMemoryCollection, InMemoryStore, StoreCommand};
