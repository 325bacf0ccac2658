//! Cosmos DB administrative client.

mod auth;
mod client;
mod error;

pub use auth::{authorization_token, rfc1123_date, MasterKey};
pub use client::CosmosAdminClient;
