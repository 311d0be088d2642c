//! HTTP API handlers for mirror-api

pub mod admin;
pub mod artifacts;
pub mod auth;
pub mod buildinfo;
pub mod error;
pub mod gifts;
pub mod health;
pub mod receipts;
pub mod registrations;

pub use artifacts::create_artifact;
pub use auth::auth_middleware;
pub use buildinfo::get_build_info;
pub use error::{ApiError, ApiResult};
pub use gifts::{create_gift, get_gift, redeem_gift};
pub use health::health_routes;
pub use receipts::{create_receipt, get_receipt};
pub use registrations::register;
