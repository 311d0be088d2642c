//! API utilities shared by Mirror of Dreams services
//!
//! HTTP-framework specific code (middleware, extractors) lives in the
//! service crates; this module only holds pure functions and store access.

pub mod auth;

pub use auth::{
    calculate_hash, load_shared_secret, to_canonical_json, validate_hash, validate_timestamp,
    ApiAuthError,
};
