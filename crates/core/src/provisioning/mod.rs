//! Provisioning policies, administrative resources and the factory seam.

mod error;
mod outcome;
mod throughput;
mod traits;
mod types;

pub use error::{ProvisioningError, Result};
pub use outcome::ScaleOutcome;
pub use throughput::{
    throughput_for_collections, DEFAULT_INITIAL_THROUGHPUT, MIN_THROUGHPUT,
    THROUGHPUT_PER_COLLECTION,
};
pub use traits::{AdminClient, ConnectionFactory};
pub use types::{CollectionResource, DatabaseResource, Offer, OfferContent};
