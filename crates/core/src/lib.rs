//! Core types for portamongo.
//!
//! Everything in this crate is pure: configuration values, naming and
//! throughput policies, administrative resource shapes and the trait seams
//! that the I/O backends in the `portamongo` crate implement. The MongoDB
//! driver is used here only for its connection string parser.

pub mod collection;
pub mod config;
pub mod connection;
pub mod provisioning;
pub mod storage;
