//! Season entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sideline_core::schedule::SeasonWindow;
use sideline_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

use super::status::StatusId;

/// A row from the `seasons` table.
///
/// Configuration columns are immutable after creation; the mutable tail
/// (`status_id`, `fixtures_*`, `registered_teams_count`,
/// `total_matches_planned`) is guarded by the `version` optimistic-lock
/// counter, which every state-changing statement bumps.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Season {
    pub id: Uuid,
    pub league_id: Uuid,
    pub name: String,
    pub season_year: i32,
    pub tournament_format: i16,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub registration_deadline: Option<Timestamp>,
    pub match_frequency_days: i32,
    pub preferred_match_time: NaiveTime,
    pub min_teams: i32,
    pub max_teams: i32,
    pub rounds_per_pairing: i16,
    pub points_for_win: i32,
    pub points_for_draw: i32,
    pub points_for_loss: i32,
    pub allow_draws: bool,
    pub home_away_balance_required: bool,
    pub status_id: StatusId,
    pub fixtures_status_id: StatusId,
    pub fixtures_error: Option<String>,
    pub fixtures_generated_at: Option<Timestamp>,
    pub registered_teams_count: i32,
    pub total_matches_planned: Option<i32>,
    pub cancel_reason: Option<String>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Season {
    /// Scheduling inputs for the fixture scheduler.
    pub fn window(&self) -> SeasonWindow {
        SeasonWindow {
            start_date: self.start_date,
            end_date: self.end_date,
            match_frequency_days: self.match_frequency_days.max(1) as u32,
            preferred_match_time: self.preferred_match_time,
        }
    }
}

/// Query parameters for `GET /api/v1/seasons`.
#[derive(Debug, Deserialize)]
pub struct SeasonListQuery {
    pub league_id: Uuid,
}

/// Body for `POST /api/v1/seasons/{id}/cancel`.
#[derive(Debug, Deserialize)]
pub struct CancelSeasonRequest {
    pub reason: String,
}
