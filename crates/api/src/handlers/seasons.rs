//! Handlers for season creation and lifecycle transitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use sideline_core::season::SeasonConfig;
use sideline_db::models::season::{CancelSeasonRequest, SeasonListQuery};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

/// POST /api/v1/seasons
///
/// Create a season in `draft` from a validated configuration. Returns 201
/// with the created row.
pub async fn create_season(
    State(state): State<AppState>,
    Json(config): Json<SeasonConfig>,
) -> AppResult<impl IntoResponse> {
    let season = state.lifecycle.create_season(config).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: season })))
}

/// GET /api/v1/seasons?league_id=...
///
/// List a league's seasons, newest cycle first.
pub async fn list_seasons(
    State(state): State<AppState>,
    Query(params): Query<SeasonListQuery>,
) -> AppResult<impl IntoResponse> {
    let seasons = state.lifecycle.list_seasons(params.league_id).await?;
    Ok(Json(DataResponse { data: seasons }))
}

/// GET /api/v1/seasons/{id}
///
/// Season details with the live team list in registration order. Also
/// runs the fixture-count reconciliation check.
pub async fn get_season(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let details = state.lifecycle.season_details(season_id).await?;
    Ok(Json(DataResponse { data: details }))
}

// ---------------------------------------------------------------------------
// Lifecycle transitions
// ---------------------------------------------------------------------------

/// POST /api/v1/seasons/{id}/registration/open
///
/// Move a draft season into `registration`. 409 otherwise.
pub async fn open_registration(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let season = state.lifecycle.open_registration(season_id).await?;
    Ok(Json(DataResponse { data: season }))
}

/// POST /api/v1/seasons/{id}/activate
///
/// Activate a season whose fixtures are complete and whose team count is
/// within bounds.
pub async fn activate_season(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let season = state.lifecycle.activate_season(season_id).await?;
    Ok(Json(DataResponse { data: season }))
}

/// POST /api/v1/seasons/{id}/complete
///
/// Complete an active season once all matches are terminal or the window
/// has ended.
pub async fn complete_season(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let season = state.lifecycle.complete_season(season_id).await?;
    Ok(Json(DataResponse { data: season }))
}

/// POST /api/v1/seasons/{id}/cancel
///
/// Cancel a season from any non-terminal state; unfinished matches are
/// cancelled with it.
pub async fn cancel_season(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
    Json(body): Json<CancelSeasonRequest>,
) -> AppResult<impl IntoResponse> {
    let season = state
        .lifecycle
        .cancel_season(season_id, &body.reason)
        .await?;
    Ok(Json(DataResponse { data: season }))
}
