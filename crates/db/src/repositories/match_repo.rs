//! Repository for the `matches` table.
//!
//! Match rows are inserted by `SeasonRepo::commit_fixtures` as part of the
//! atomic generation commit; this repository covers the read side and the
//! cancellation paths.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matches::Match;
use crate::models::status::MatchStatus;

/// Column list for `matches` queries.
const COLUMNS: &str = "\
    id, season_id, home_team_id, away_team_id, round_number, match_date, \
    status_id, home_score, away_score, venue, created_at, updated_at";

/// Provides read and cancellation operations for matches.
pub struct MatchRepo;

impl MatchRepo {
    /// List a season's matches in schedule order.
    pub async fn list_by_season(pool: &PgPool, season_id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches \
             WHERE season_id = $1 \
             ORDER BY round_number ASC, match_date ASC, id ASC"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(season_id)
            .fetch_all(pool)
            .await
    }

    /// Count all matches persisted for a season (reconciliation input).
    pub async fn count_by_season(pool: &PgPool, season_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM matches WHERE season_id = $1")
                .bind(season_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Count all matches and how many have reached a terminal state
    /// (completed or cancelled). Used by season completion.
    pub async fn count_with_terminal(
        pool: &PgPool,
        season_id: Uuid,
    ) -> Result<(i64, i64), sqlx::Error> {
        let (total, terminal): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status_id IN ($2, $3)) \
             FROM matches WHERE season_id = $1",
        )
        .bind(season_id)
        .bind(MatchStatus::Completed.id())
        .bind(MatchStatus::Cancelled.id())
        .fetch_one(pool)
        .await?;
        Ok((total, terminal))
    }
}
