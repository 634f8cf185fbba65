//! Season membership model and DTOs.

use serde::{Deserialize, Serialize};
use sideline_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

use super::status::StatusId;

/// A row from the `season_teams` table.
///
/// `registration_date` ascending (id as tiebreak) is the canonical
/// ordering the fixture generator consumes, which is what makes
/// generation deterministic for a fixed registration history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SeasonTeam {
    pub id: Uuid,
    pub season_id: Uuid,
    pub team_id: Uuid,
    pub registration_date: Timestamp,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body for `POST /api/v1/seasons/{id}/teams`.
#[derive(Debug, Deserialize)]
pub struct RegisterTeamRequest {
    pub team_id: Uuid,
}
