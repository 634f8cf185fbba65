//! Repository for the `seasons` table.
//!
//! Every state-changing statement bumps `version`; multi-step flows pass
//! the version they read as an optimistic guard, so a row that moved under
//! a caller turns into an affected-row count of zero rather than a lost
//! update. `try_begin_generation` is the single synchronization point for
//! the fixture pipeline.

use sideline_core::season::SeasonConfig;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matches::NewMatch;
use crate::models::season::Season;
use crate::models::status::{FixturesStatus, MatchStatus, SeasonStatus, StatusId};

/// Column list for `seasons` queries.
const COLUMNS: &str = "\
    id, league_id, name, season_year, tournament_format, start_date, end_date, \
    registration_deadline, match_frequency_days, preferred_match_time, \
    min_teams, max_teams, rounds_per_pairing, \
    points_for_win, points_for_draw, points_for_loss, \
    allow_draws, home_away_balance_required, \
    status_id, fixtures_status_id, fixtures_error, fixtures_generated_at, \
    registered_teams_count, total_matches_planned, cancel_reason, \
    version, created_at, updated_at";

/// Provides persistence operations for seasons and the fixture pipeline.
pub struct SeasonRepo;

impl SeasonRepo {
    /// Insert a new season in `draft` with a pending fixture pipeline.
    pub async fn create(pool: &PgPool, config: &SeasonConfig) -> Result<Season, sqlx::Error> {
        let query = format!(
            "INSERT INTO seasons \
                (league_id, name, season_year, tournament_format, start_date, end_date, \
                 registration_deadline, match_frequency_days, preferred_match_time, \
                 min_teams, max_teams, rounds_per_pairing, \
                 points_for_win, points_for_draw, points_for_loss, \
                 allow_draws, home_away_balance_required, status_id, fixtures_status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(config.league_id)
            .bind(&config.name)
            .bind(config.season_year)
            .bind(config.tournament_format.id())
            .bind(config.start_date)
            .bind(config.end_date)
            .bind(config.registration_deadline)
            .bind(config.match_frequency_days)
            .bind(config.preferred_match_time)
            .bind(config.min_teams)
            .bind(config.max_teams)
            .bind(config.rounds_per_pairing)
            .bind(config.points_for_win)
            .bind(config.points_for_draw)
            .bind(config.points_for_loss)
            .bind(config.allow_draws)
            .bind(config.home_away_balance_required)
            .bind(SeasonStatus::Draft.id())
            .bind(FixturesStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a season by its id.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Season>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seasons WHERE id = $1");
        sqlx::query_as::<_, Season>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all seasons for a league, newest cycle first.
    pub async fn list_by_league(pool: &PgPool, league_id: Uuid) -> Result<Vec<Season>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM seasons \
             WHERE league_id = $1 \
             ORDER BY season_year DESC, created_at DESC"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(league_id)
            .fetch_all(pool)
            .await
    }

    /// Transition the season status, guarded by the expected current
    /// status and version. Returns `None` when the row moved under the
    /// caller or is not in `from` anymore.
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        expected_version: i64,
        from: StatusId,
        to: StatusId,
    ) -> Result<Option<Season>, sqlx::Error> {
        let query = format!(
            "UPDATE seasons \
             SET status_id = $4, version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 AND status_id = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// The generation claim (compare-and-swap).
    ///
    /// Atomically flips the fixture pipeline to `generating`, guarded by
    /// the expected version, the allowed source statuses, and the season
    /// still being open for registration. At most one caller can win;
    /// losers get `None` and must re-read to distinguish "another
    /// generation is running" from "the row simply moved".
    pub async fn try_begin_generation(
        pool: &PgPool,
        id: Uuid,
        expected_version: i64,
        allowed_from: &[StatusId],
    ) -> Result<Option<Season>, sqlx::Error> {
        let query = format!(
            "UPDATE seasons \
             SET fixtures_status_id = $3, fixtures_error = NULL, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 \
               AND fixtures_status_id = ANY($4) AND status_id = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(FixturesStatus::Generating.id())
            .bind(allowed_from.to_vec())
            .bind(SeasonStatus::Registration.id())
            .fetch_optional(pool)
            .await
    }

    /// All-or-nothing fixture commit.
    ///
    /// In one transaction: optionally clears prior matches, inserts the
    /// new set, and completes the fixture pipeline with
    /// `fixtures_generated_at` and `total_matches_planned`, re-checked
    /// against the version taken at claim time. A version conflict rolls
    /// everything back and returns `None` — no partial match set can ever
    /// be observed.
    pub async fn commit_fixtures(
        pool: &PgPool,
        season_id: Uuid,
        claimed_version: i64,
        matches: &[NewMatch],
        replace_existing: bool,
    ) -> Result<Option<Season>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if replace_existing {
            sqlx::query("DELETE FROM matches WHERE season_id = $1")
                .bind(season_id)
                .execute(&mut *tx)
                .await?;
        }

        for m in matches {
            sqlx::query(
                "INSERT INTO matches \
                     (season_id, home_team_id, away_team_id, round_number, match_date, status_id, venue) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(m.season_id)
            .bind(m.home_team_id)
            .bind(m.away_team_id)
            .bind(m.round_number)
            .bind(m.match_date)
            .bind(MatchStatus::Scheduled.id())
            .bind(&m.venue)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "UPDATE seasons \
             SET fixtures_status_id = $3, fixtures_generated_at = NOW(), \
                 total_matches_planned = $4, fixtures_error = NULL, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 AND fixtures_status_id = $5 \
             RETURNING {COLUMNS}"
        );
        let season = sqlx::query_as::<_, Season>(&query)
            .bind(season_id)
            .bind(claimed_version)
            .bind(FixturesStatus::Completed.id())
            .bind(matches.len() as i32)
            .bind(FixturesStatus::Generating.id())
            .fetch_optional(&mut *tx)
            .await?;

        match season {
            Some(season) => {
                tx.commit().await?;
                Ok(Some(season))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    /// Record a failed generation attempt. Only applies while the row is
    /// still `generating`, so a late failure cannot clobber a completed
    /// commit.
    pub async fn mark_generation_failed(
        pool: &PgPool,
        season_id: Uuid,
        reason: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE seasons \
             SET fixtures_status_id = $2, fixtures_error = $3, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND fixtures_status_id = $4",
        )
        .bind(season_id)
        .bind(FixturesStatus::Error.id())
        .bind(reason)
        .bind(FixturesStatus::Generating.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Operator recovery for a crashed generation attempt.
    ///
    /// Only applies when the row has sat in `generating` longer than
    /// `stale_after_secs` — a fresh claim is left alone to avoid a
    /// double-generation race.
    pub async fn reset_stale_generation(
        pool: &PgPool,
        season_id: Uuid,
        stale_after_secs: i64,
    ) -> Result<Option<Season>, sqlx::Error> {
        let query = format!(
            "UPDATE seasons \
             SET fixtures_status_id = $2, \
                 fixtures_error = 'generation attempt presumed crashed (operator reset)', \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND fixtures_status_id = $3 \
               AND updated_at < NOW() - make_interval(secs => $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(season_id)
            .bind(FixturesStatus::Error.id())
            .bind(FixturesStatus::Generating.id())
            .bind(stale_after_secs as f64)
            .fetch_optional(pool)
            .await
    }

    /// Flag a completed fixture set whose persisted match count disagrees
    /// with the planned total (a torn write detected on read).
    pub async fn flag_reconciliation_error(
        pool: &PgPool,
        season_id: Uuid,
        expected_version: i64,
        persisted: i64,
        planned: i64,
    ) -> Result<Option<Season>, sqlx::Error> {
        let reason =
            format!("fixture count mismatch: {persisted} persisted, {planned} planned");
        let query = format!(
            "UPDATE seasons \
             SET fixtures_status_id = $3, fixtures_error = $4, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 AND fixtures_status_id = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Season>(&query)
            .bind(season_id)
            .bind(expected_version)
            .bind(FixturesStatus::Error.id())
            .bind(reason)
            .bind(FixturesStatus::Completed.id())
            .fetch_optional(pool)
            .await
    }

    /// Cancel a season and every unfinished match in one transaction.
    ///
    /// Returns `None` when the version moved or the season is already in
    /// a terminal state.
    pub async fn cancel_with_matches(
        pool: &PgPool,
        season_id: Uuid,
        expected_version: i64,
        reason: &str,
    ) -> Result<Option<Season>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE seasons \
             SET status_id = $3, cancel_reason = $4, \
                 version = version + 1, updated_at = NOW() \
             WHERE id = $1 AND version = $2 AND status_id NOT IN ($5, $6) \
             RETURNING {COLUMNS}"
        );
        let season = sqlx::query_as::<_, Season>(&query)
            .bind(season_id)
            .bind(expected_version)
            .bind(SeasonStatus::Cancelled.id())
            .bind(reason)
            .bind(SeasonStatus::Completed.id())
            .bind(SeasonStatus::Cancelled.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(season) = season else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query(
            "UPDATE matches \
             SET status_id = $2, updated_at = NOW() \
             WHERE season_id = $1 AND status_id NOT IN ($3, $4)",
        )
        .bind(season_id)
        .bind(MatchStatus::Cancelled.id())
        .bind(MatchStatus::Completed.id())
        .bind(MatchStatus::Cancelled.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(season))
    }
}
