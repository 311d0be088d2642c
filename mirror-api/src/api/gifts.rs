//! Gift endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use mirror_common::records::{Gift, NewGift};
use serde::Deserialize;

use super::ApiResult;
use crate::AppState;

/// POST /api/gift
pub async fn create_gift(
    State(state): State<AppState>,
    payload: Result<Json<NewGift>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Gift>)> {
    let Json(input) = payload?;
    let gift = state.gifts.create_gift(input).await?;
    Ok((StatusCode::CREATED, Json(gift)))
}

/// GET /api/gift/:code
pub async fn get_gift(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<Gift>> {
    Ok(Json(state.gifts.get_gift_by_code(&code).await?))
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub email: String,
}

/// POST /api/gift/:code/redeem
pub async fn redeem_gift(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<RedeemRequest>, JsonRejection>,
) -> ApiResult<Json<Gift>> {
    let Json(request) = payload?;
    let gift = state.gifts.redeem_gift(&code, &request.email).await?;
    Ok(Json(gift))
}
