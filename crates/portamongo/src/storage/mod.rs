//! Storage backend implementations.
//!
//! Concrete implementations of the traits defined in
//! `portamongo_core::storage`.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): in-memory store and administrative backends used
//!   by the test suites.

pub mod mongo;

#[cfg(feature = "inmemory")]
pub mod inmemory;

pub use mongo::MongoStore;
