//! Registration endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use mirror_common::records::{NewRegistration, Registration};

use super::ApiResult;
use crate::AppState;

/// POST /api/register
///
/// 409 when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewRegistration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Registration>)> {
    let Json(input) = payload?;
    let registration = state.registrations.create_registration(input).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}
