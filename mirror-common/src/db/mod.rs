//! Database initialization and schema

pub mod init;

pub use init::{create_kv_store_table, init_database};
