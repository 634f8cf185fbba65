//! Repository for the `season_teams` table.
//!
//! Membership changes and the season's cached `registered_teams_count`
//! always move in the same transaction, with the season update guarded by
//! the version the caller read — so the count invariant holds and a
//! membership change can never interleave with a fixture-generation
//! commit on the same season.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::season_team::SeasonTeam;
use crate::models::status::{MatchStatus, SeasonTeamStatus};

/// Column list for `season_teams` queries.
const COLUMNS: &str =
    "id, season_id, team_id, registration_date, status_id, created_at, updated_at";

/// Provides persistence operations for season memberships.
pub struct SeasonTeamRepo;

impl SeasonTeamRepo {
    /// Insert a registration and bump the season's cached count.
    ///
    /// Returns `None` (after rollback) when the season's version moved
    /// under the caller. A concurrent duplicate registration surfaces as
    /// the `uq_season_teams_live` unique violation.
    pub async fn insert_registration(
        pool: &PgPool,
        season_id: Uuid,
        team_id: Uuid,
        expected_version: i64,
    ) -> Result<Option<SeasonTeam>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let season = sqlx::query(
            "UPDATE seasons \
             SET registered_teams_count = registered_teams_count + 1, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2",
        )
        .bind(season_id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if season.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO season_teams (season_id, team_id, status_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, SeasonTeam>(&query)
            .bind(season_id)
            .bind(team_id)
            .bind(SeasonTeamStatus::Registered.id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    /// Withdraw a team and decrement the season's cached count.
    ///
    /// When `cancel_open_matches` is set (fixtures already generated),
    /// the team's still-scheduled matches are cancelled in the same
    /// transaction; played matches are left untouched.
    pub async fn withdraw(
        pool: &PgPool,
        season_id: Uuid,
        team_id: Uuid,
        expected_version: i64,
        cancel_open_matches: bool,
    ) -> Result<Option<SeasonTeam>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let season = sqlx::query(
            "UPDATE seasons \
             SET registered_teams_count = registered_teams_count - 1, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2",
        )
        .bind(season_id)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if season.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "UPDATE season_teams \
             SET status_id = $3, updated_at = NOW() \
             WHERE season_id = $1 AND team_id = $2 AND status_id <> $3 \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, SeasonTeam>(&query)
            .bind(season_id)
            .bind(team_id)
            .bind(SeasonTeamStatus::Withdrawn.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(entry) = entry else {
            tx.rollback().await?;
            return Ok(None);
        };

        if cancel_open_matches {
            sqlx::query(
                "UPDATE matches \
                 SET status_id = $3, updated_at = NOW() \
                 WHERE season_id = $1 \
                   AND (home_team_id = $2 OR away_team_id = $2) \
                   AND status_id = $4",
            )
            .bind(season_id)
            .bind(team_id)
            .bind(MatchStatus::Cancelled.id())
            .bind(MatchStatus::Scheduled.id())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(entry))
    }

    /// Find a team's live (non-withdrawn) membership in a season.
    pub async fn find_active(
        pool: &PgPool,
        season_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<SeasonTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM season_teams \
             WHERE season_id = $1 AND team_id = $2 AND status_id <> $3"
        );
        sqlx::query_as::<_, SeasonTeam>(&query)
            .bind(season_id)
            .bind(team_id)
            .bind(SeasonTeamStatus::Withdrawn.id())
            .fetch_optional(pool)
            .await
    }

    /// List live memberships in canonical order: registration date
    /// ascending, id as tiebreak. This is the input order the fixture
    /// generator consumes.
    pub async fn list_active_ordered(
        pool: &PgPool,
        season_id: Uuid,
    ) -> Result<Vec<SeasonTeam>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM season_teams \
             WHERE season_id = $1 AND status_id <> $2 \
             ORDER BY registration_date ASC, id ASC"
        );
        sqlx::query_as::<_, SeasonTeam>(&query)
            .bind(season_id)
            .bind(SeasonTeamStatus::Withdrawn.id())
            .fetch_all(pool)
            .await
    }

    /// Count live memberships (the source of truth behind the cached
    /// `registered_teams_count`).
    pub async fn count_active(pool: &PgPool, season_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM season_teams WHERE season_id = $1 AND status_id <> $2",
        )
        .bind(season_id)
        .bind(SeasonTeamStatus::Withdrawn.id())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
