//! # Mirror of Dreams Common Library
//!
//! Shared code for the Mirror of Dreams services including:
//! - Error type and result alias
//! - Bootstrap configuration and root folder resolution
//! - SQLite initialization
//! - Key-value store backends and whole-array record collections
//! - Legacy receipt, gift and registration records
//! - Request authentication (timestamp + hash)

pub mod api;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;
pub mod records;
pub mod store;

pub use error::{Error, Result};
pub use store::{KeyValueStore, MemoryStore, Record, RecordCollection, SharedStore};
