//! Match entity model and insert payload.

use serde::Serialize;
use sideline_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

use super::status::StatusId;

/// A row from the `matches` table.
///
/// Created exclusively by fixture generation. The result-recording
/// collaborator later mutates scores and status, never the team pairing
/// or round number.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Match {
    pub id: Uuid,
    pub season_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub match_date: Timestamp,
    pub status_id: StatusId,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub venue: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload produced by the generation pipeline.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub season_id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub round_number: i32,
    pub match_date: Timestamp,
    pub venue: Option<String>,
}
