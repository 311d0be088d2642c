//! Payment receipt endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use mirror_common::records::{NewReceipt, Receipt};

use super::ApiResult;
use crate::AppState;

/// POST /api/payment/receipts
pub async fn create_receipt(
    State(state): State<AppState>,
    payload: Result<Json<NewReceipt>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let Json(input) = payload?;
    let receipt = state.receipts.create_receipt(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /api/payment/receipts/:receipt_number
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(receipt_number): Path<String>,
) -> ApiResult<Json<Receipt>> {
    let receipt = state.receipts.find_by_number(&receipt_number).await?;
    Ok(Json(receipt))
}
