//! MongoDB storage backend implementation.
//!
//! This module provides the `DocumentStore` implementation used for both
//! deployment locations, built on the official `mongodb` driver.

mod error;
mod settings;
mod store;

pub use settings::client_options;
pub use store::MongoStore;
