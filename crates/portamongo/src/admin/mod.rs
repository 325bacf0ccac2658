//! Administrative clients for managed-cloud deployments.

pub mod cosmos;

pub use cosmos::CosmosAdminClient;
