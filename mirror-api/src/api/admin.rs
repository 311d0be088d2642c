//! Admin record management
//!
//! Mounted behind [`auth_middleware`](super::auth_middleware).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use mirror_common::records::{
    Gift, GiftStatus, Receipt, ReceiptStatus, Registration, RegistrationStatus,
};
use serde::Deserialize;

use super::{ApiError, ApiResult};
use crate::AppState;

/// PUT body for status changes
///
/// Authenticated requests also carry `timestamp` and `hash`; they are
/// ignored here.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

fn parse_status<T>(value: &str, parse: fn(&str) -> Option<T>, allowed: &[&str]) -> ApiResult<T> {
    parse(value).ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Unknown status '{}' (expected one of: {})",
            value,
            allowed.join(", ")
        ))
    })
}

// ========================================
// Receipts
// ========================================

/// GET /api/admin/receipts
pub async fn list_receipts(State(state): State<AppState>) -> ApiResult<Json<Vec<Receipt>>> {
    Ok(Json(state.receipts.list_receipts().await?))
}

/// PUT /api/admin/receipts/:id/status
pub async fn update_receipt_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Receipt>> {
    let Json(update) = payload?;
    let status = parse_status(
        &update.status,
        ReceiptStatus::from_str,
        &["pending", "completed", "refunded", "failed"],
    )?;
    Ok(Json(state.receipts.update_receipt_status(&id, status).await?))
}

/// DELETE /api/admin/receipts/:id
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Receipt>> {
    Ok(Json(state.receipts.delete_receipt(&id).await?))
}

// ========================================
// Gifts
// ========================================

/// GET /api/admin/gifts
pub async fn list_gifts(State(state): State<AppState>) -> ApiResult<Json<Vec<Gift>>> {
    Ok(Json(state.gifts.list_gifts().await?))
}

/// PUT /api/admin/gifts/:id/status
pub async fn update_gift_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Gift>> {
    let Json(update) = payload?;
    let status = parse_status(
        &update.status,
        GiftStatus::from_str,
        &["pending", "active", "redeemed", "cancelled"],
    )?;
    Ok(Json(state.gifts.update_gift_status(&id, status).await?))
}

/// DELETE /api/admin/gifts/:id
pub async fn delete_gift(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Gift>> {
    Ok(Json(state.gifts.delete_gift(&id).await?))
}

// ========================================
// Registrations
// ========================================

/// GET /api/admin/registrations
pub async fn list_registrations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Registration>>> {
    Ok(Json(state.registrations.list_registrations().await?))
}

/// PUT /api/admin/registrations/:id/status
pub async fn update_registration_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Registration>> {
    let Json(update) = payload?;
    let status = parse_status(
        &update.status,
        RegistrationStatus::from_str,
        &["pending", "confirmed", "cancelled"],
    )?;
    Ok(Json(
        state
            .registrations
            .update_registration_status(&id, status)
            .await?,
    ))
}

/// DELETE /api/admin/registrations/:id
pub async fn delete_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Registration>> {
    Ok(Json(state.registrations.delete_registration(&id).await?))
}
