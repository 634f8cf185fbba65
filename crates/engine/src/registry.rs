//! Season team registry.
//!
//! Owns team membership for a season and the cached registered-team
//! count. Every membership change moves in one transaction with the
//! season's count and version, so the count invariant holds and a change
//! can never interleave with a fixture-generation commit.

use uuid::Uuid;

use sideline_core::error::SeasonError;
use sideline_core::lifecycle::season_state;
use sideline_db::models::season_team::SeasonTeam;
use sideline_db::models::status::{FixturesStatus, SeasonStatus};
use sideline_db::repositories::SeasonTeamRepo;
use sideline_db::DbPool;

use crate::error::EngineResult;
use crate::require_season;

/// Manages team registration and withdrawal for seasons.
pub struct SeasonTeamRegistry {
    pool: DbPool,
}

impl SeasonTeamRegistry {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a team for a season.
    ///
    /// Fails with `RegistrationClosed` unless the season is in
    /// `registration` (and not mid-generation), `DuplicateRegistration`
    /// for a team with a live membership, and `SeasonFull` at the
    /// capacity bound.
    pub async fn register_team(&self, season_id: Uuid, team_id: Uuid) -> EngineResult<SeasonTeam> {
        let season = require_season(&self.pool, season_id).await?;

        if season.status_id != SeasonStatus::Registration.id() {
            return Err(SeasonError::RegistrationClosed(format!(
                "season is {}",
                season_state::status_name(season.status_id)
            ))
            .into());
        }
        if season.fixtures_status_id == FixturesStatus::Generating.id() {
            return Err(
                SeasonError::RegistrationClosed("fixture generation is in progress".into()).into(),
            );
        }
        if SeasonTeamRepo::find_active(&self.pool, season_id, team_id)
            .await?
            .is_some()
        {
            return Err(SeasonError::DuplicateRegistration { team_id }.into());
        }
        if season.registered_teams_count >= season.max_teams {
            return Err(SeasonError::SeasonFull {
                max: season.max_teams,
            }
            .into());
        }

        match SeasonTeamRepo::insert_registration(&self.pool, season_id, team_id, season.version)
            .await?
        {
            Some(entry) => {
                tracing::info!(
                    season_id = %season_id,
                    team_id = %team_id,
                    teams = season.registered_teams_count + 1,
                    "Team registered",
                );
                Ok(entry)
            }
            None => Err(SeasonError::ConcurrentModification.into()),
        }
    }

    /// Withdraw a team from a season.
    ///
    /// When the season's fixtures are already generated, the team's
    /// still-scheduled matches are cancelled in the same transaction;
    /// played matches stay untouched.
    pub async fn withdraw_team(&self, season_id: Uuid, team_id: Uuid) -> EngineResult<SeasonTeam> {
        let season = require_season(&self.pool, season_id).await?;

        if SeasonTeamRepo::find_active(&self.pool, season_id, team_id)
            .await?
            .is_none()
        {
            return Err(SeasonError::NotFound {
                entity: "SeasonTeam",
                id: team_id,
            }
            .into());
        }

        let cancel_open_matches = season.fixtures_status_id == FixturesStatus::Completed.id();
        match SeasonTeamRepo::withdraw(
            &self.pool,
            season_id,
            team_id,
            season.version,
            cancel_open_matches,
        )
        .await?
        {
            Some(entry) => {
                tracing::info!(
                    season_id = %season_id,
                    team_id = %team_id,
                    cancelled_open_matches = cancel_open_matches,
                    "Team withdrawn",
                );
                Ok(entry)
            }
            None => Err(SeasonError::ConcurrentModification.into()),
        }
    }

    /// Live memberships in canonical registration order — the input
    /// order fixture generation consumes.
    pub async fn list_registered_teams(&self, season_id: Uuid) -> EngineResult<Vec<SeasonTeam>> {
        require_season(&self.pool, season_id).await?;
        Ok(SeasonTeamRepo::list_active_ordered(&self.pool, season_id).await?)
    }
}
