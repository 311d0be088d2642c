//! Error type shared by the Mirror of Dreams crates

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value did not match the expected JSON shape
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Bootstrap configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key holds data of an unexpected kind
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected by record validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record state forbids the operation (duplicate email, spent gift)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
