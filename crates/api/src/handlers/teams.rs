//! Handlers for season team registration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use sideline_db::models::season_team::RegisterTeamRequest;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/seasons/{id}/teams
///
/// Register a team for a season. Returns 201 with the membership row;
/// 409 for duplicates or a full season, 400 when registration is closed.
pub async fn register_team(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
    Json(body): Json<RegisterTeamRequest>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .registry
        .register_team(season_id, body.team_id)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/seasons/{id}/teams
///
/// Live memberships in canonical registration order — the order fixture
/// generation consumes.
pub async fn list_teams(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let teams = state.registry.list_registered_teams(season_id).await?;
    Ok(Json(DataResponse { data: teams }))
}

/// DELETE /api/v1/seasons/{id}/teams/{team_id}
///
/// Withdraw a team. When fixtures are already generated, the team's
/// still-scheduled matches are cancelled in the same transaction.
pub async fn withdraw_team(
    State(state): State<AppState>,
    Path((season_id, team_id)): Path<(Uuid, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let entry = state.registry.withdraw_team(season_id, team_id).await?;
    Ok(Json(DataResponse { data: entry }))
}
