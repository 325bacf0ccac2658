//! Provision MongoDB databases and manage their collections on a
//! self-hosted deployment or on a throughput-provisioned managed service.
//!
//! Startup order:
//!
//! ```rust,ignore
//! let factory = Arc::new(MongoConnectionFactory::new(config));
//! let provisioner = Provisioner::new(factory.clone());
//! let collections = CollectionService::new(factory);
//!
//! provisioner.ensure_database_created().await?;
//! collections.create_collection::<Order>().await?;
//! provisioner.scale_throughput().await?;
//! ```

pub mod admin;
mod cancel;
pub mod collections;
pub mod factory;
pub mod provisioning;
pub mod storage;

pub use collections::{CollectionHandle, CollectionService};
pub use factory::MongoConnectionFactory;
pub use provisioning::Provisioner;
