//! Handlers for the fixture generation pipeline and match reads.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/seasons/{id}/fixtures/generate
///
/// Close registration and generate the fixture list. Exactly one
/// concurrent caller wins; the rest get 409 `GENERATION_IN_PROGRESS`.
pub async fn generate_fixtures(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let outcome = state
        .lifecycle
        .close_registration_and_generate_fixtures(season_id)
        .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/seasons/{id}/fixtures/regenerate
///
/// Replace previously generated fixtures. Only allowed while the season
/// is still in `registration`.
pub async fn regenerate_fixtures(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.lifecycle.regenerate_fixtures(season_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/seasons/{id}/fixtures/preview
///
/// Run the generation pipeline without persisting anything — same
/// validation and fixture set a real run would produce.
pub async fn preview_fixtures(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let fixtures = state.lifecycle.preview_fixtures(season_id).await?;
    Ok(Json(DataResponse { data: fixtures }))
}

/// POST /api/v1/seasons/{id}/fixtures/reset
///
/// Operator recovery: reset a generation attempt stuck in `generating`
/// past the watchdog interval. Never automatic.
pub async fn reset_stale_generation(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let season = state.lifecycle.reset_stale_generation(season_id).await?;
    Ok(Json(DataResponse { data: season }))
}

/// GET /api/v1/seasons/{id}/matches
///
/// A season's matches in schedule order.
pub async fn list_matches(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let matches = state.lifecycle.season_matches(season_id).await?;
    Ok(Json(DataResponse { data: matches }))
}
