//! Collection management.
//!
//! Collections are named after the entity type stored in them
//! (`Order` lives in the `Order` collection) and are partitioned on `_id`
//! when the deployment supports sharding.

mod service;

pub use service::{CollectionHandle, CollectionService};
