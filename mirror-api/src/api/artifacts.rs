//! Artifact rendering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use mirror_art::AnalysisResult;
use tracing::debug;

use super::{ApiError, ApiResult};
use crate::AppState;

/// POST /api/artifacts
///
/// Body is an analysis result (`tone`, `selectedSentences`, `colorPalette`,
/// ...). Responds with the rendered artifact as `image/png`.
pub async fn create_artifact(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisResult>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(analysis) = payload?;
    debug!("Artifact requested: tone={}", analysis.tone);

    // Rendering is CPU-bound; keep it off the async workers
    let generator = state.generator.clone();
    let png = tokio::task::spawn_blocking(move || {
        let artifact = generator.generate(&analysis)?;
        artifact.to_png()
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Render task failed: {}", e)))??;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
