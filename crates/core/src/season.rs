//! Season configuration model.
//!
//! The configuration is a closed struct with named, typed fields — there is
//! no open `settings`/`metadata` map, so an invalid season is rejected at
//! construction time rather than at generation time.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::SeasonError;
use crate::types::Timestamp;

/// Tournament formats. Only [`TournamentFormat::League`] can generate
/// fixtures today; knockout and hybrid seasons can be created but fail
/// generation with a validation error (extension point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    League,
    Knockout,
    Hybrid,
}

impl TournamentFormat {
    /// Database status id (1-based SMALLINT).
    pub fn id(self) -> i16 {
        match self {
            Self::League => 1,
            Self::Knockout => 2,
            Self::Hybrid => 3,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::League),
            2 => Some(Self::Knockout),
            3 => Some(Self::Hybrid),
            _ => None,
        }
    }
}

/// Configuration supplied when creating a season.
///
/// Field-level bounds run through the `validator` derive; cross-field
/// rules (window ordering, team bounds, draw points) run in
/// [`SeasonConfig::validated`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SeasonConfig {
    pub league_id: Uuid,

    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(range(min = 2000, max = 2100))]
    pub season_year: i32,

    #[serde(default = "defaults::format")]
    pub tournament_format: TournamentFormat,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    pub registration_deadline: Option<Timestamp>,

    /// Days between consecutive rounds.
    #[serde(default = "defaults::match_frequency_days")]
    #[validate(range(min = 1, max = 60))]
    pub match_frequency_days: i32,

    /// Kick-off time stamped onto every computed match date (UTC).
    #[serde(default = "defaults::match_time")]
    pub preferred_match_time: NaiveTime,

    #[serde(default = "defaults::min_teams")]
    #[validate(range(min = 2))]
    pub min_teams: i32,

    #[validate(range(min = 2, max = 64))]
    pub max_teams: i32,

    /// 1 = single round-robin, 2 = double (home and away).
    #[serde(default = "defaults::rounds_per_pairing")]
    #[validate(range(min = 1, max = 2))]
    pub rounds_per_pairing: i16,

    #[serde(default = "defaults::points_for_win")]
    pub points_for_win: i32,

    #[serde(default = "defaults::points_for_draw")]
    pub points_for_draw: i32,

    #[serde(default)]
    pub points_for_loss: i32,

    #[serde(default = "defaults::yes")]
    pub allow_draws: bool,

    #[serde(default = "defaults::yes")]
    pub home_away_balance_required: bool,
}

mod defaults {
    use chrono::NaiveTime;

    use super::TournamentFormat;

    pub fn format() -> TournamentFormat {
        TournamentFormat::League
    }

    pub fn match_frequency_days() -> i32 {
        7
    }

    pub fn match_time() -> NaiveTime {
        NaiveTime::from_hms_opt(15, 0, 0).unwrap()
    }

    pub fn min_teams() -> i32 {
        2
    }

    pub fn rounds_per_pairing() -> i16 {
        1
    }

    pub fn points_for_win() -> i32 {
        3
    }

    pub fn points_for_draw() -> i32 {
        1
    }

    pub fn yes() -> bool {
        true
    }
}

impl SeasonConfig {
    /// Run all field and cross-field checks, mapping failures into the
    /// domain error taxonomy.
    pub fn validated(self) -> Result<Self, SeasonError> {
        self.validate()
            .map_err(|errs| SeasonError::Validation(errs.to_string()))?;

        if self.end_date <= self.start_date {
            return Err(SeasonError::Validation(
                "end_date must be after start_date".into(),
            ));
        }
        if self.max_teams < self.min_teams {
            return Err(SeasonError::Validation(
                "max_teams must be at least min_teams".into(),
            ));
        }
        if !self.allow_draws && self.points_for_draw != 0 {
            return Err(SeasonError::Validation(
                "points_for_draw must be 0 when draws are not allowed".into(),
            ));
        }
        Ok(self)
    }

    /// Number of matches a full schedule will contain for `team_count`
    /// teams: `C(n, 2)` pairs, each met `rounds_per_pairing` times.
    pub fn planned_match_count(&self, team_count: usize) -> usize {
        if team_count < 2 {
            return 0;
        }
        team_count * (team_count - 1) / 2 * self.rounds_per_pairing as usize
    }
}
