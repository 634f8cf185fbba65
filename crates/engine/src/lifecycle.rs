//! Season lifecycle manager.
//!
//! Single source of truth for season/fixture state transitions. The
//! generation pipeline runs claim → compute → commit: the claim is a
//! compare-and-swap on the season's version (at most one generation per
//! season at a time, losers fail fast), the computation is pure, and the
//! commit is one all-or-nothing transaction. Any failure after the claim
//! records `fixtures_status = error` with the cause — a season is never
//! left silently stuck.

use chrono::{TimeZone, Utc};
use serde::Serialize;
use uuid::Uuid;

use sideline_core::error::SeasonError;
use sideline_core::lifecycle::{fixtures_state, season_state};
use sideline_core::roundrobin;
use sideline_core::schedule::{self, ScheduledFixture};
use sideline_core::season::{SeasonConfig, TournamentFormat};
use sideline_core::types::TeamId;
use sideline_db::models::matches::{Match, NewMatch};
use sideline_db::models::season::Season;
use sideline_db::models::season_team::SeasonTeam;
use sideline_db::models::status::{FixturesStatus, SeasonStatus, StatusId};
use sideline_db::repositories::{MatchRepo, SeasonRepo, SeasonTeamRepo};
use sideline_db::DbPool;

use crate::error::{EngineError, EngineResult};
use crate::require_season;

/// How long a season may sit in `generating` before an operator reset
/// treats the attempt as crashed. Resets are never automatic.
pub const STALE_GENERATION_INTERVAL_SECS: i64 = 15 * 60;

/// Outcome of a successful generation run.
#[derive(Debug, Serialize)]
pub struct GenerationOutcome {
    pub season: Season,
    pub matches_created: usize,
}

/// Season plus its live team list in canonical registration order.
#[derive(Debug, Serialize)]
pub struct SeasonDetails {
    pub season: Season,
    pub teams: Vec<SeasonTeam>,
}

/// Owns season state transitions and the fixture generation pipeline.
pub struct SeasonLifecycleManager {
    pool: DbPool,
}

impl SeasonLifecycleManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    // ── Season creation & reads ──────────────────────────────────────

    /// Validate the configuration and insert a new season in `draft`.
    pub async fn create_season(&self, config: SeasonConfig) -> EngineResult<Season> {
        let config = config.validated()?;
        let season = SeasonRepo::create(&self.pool, &config).await?;

        tracing::info!(
            season_id = %season.id,
            league_id = %season.league_id,
            season_year = season.season_year,
            "Season created",
        );

        Ok(season)
    }

    /// All seasons for a league, newest cycle first.
    pub async fn list_seasons(&self, league_id: Uuid) -> EngineResult<Vec<Season>> {
        Ok(SeasonRepo::list_by_league(&self.pool, league_id).await?)
    }

    /// Season plus its live team list.
    ///
    /// Also runs the reconciliation check: a `completed` fixture set whose
    /// persisted match count disagrees with `total_matches_planned` is a
    /// torn write and gets flipped to `error` before being returned.
    pub async fn season_details(&self, season_id: Uuid) -> EngineResult<SeasonDetails> {
        let mut season = require_season(&self.pool, season_id).await?;

        if season.fixtures_status_id == FixturesStatus::Completed.id() {
            let persisted = MatchRepo::count_by_season(&self.pool, season_id).await?;
            let planned = i64::from(season.total_matches_planned.unwrap_or(0));
            if persisted != planned {
                tracing::error!(
                    season_id = %season_id,
                    persisted,
                    planned,
                    "Fixture count mismatch detected on read; flagging season",
                );
                if let Some(flagged) = SeasonRepo::flag_reconciliation_error(
                    &self.pool,
                    season_id,
                    season.version,
                    persisted,
                    planned,
                )
                .await?
                {
                    season = flagged;
                }
            }
        }

        let teams = SeasonTeamRepo::list_active_ordered(&self.pool, season_id).await?;
        Ok(SeasonDetails { season, teams })
    }

    /// A season's matches in schedule order.
    pub async fn season_matches(&self, season_id: Uuid) -> EngineResult<Vec<Match>> {
        require_season(&self.pool, season_id).await?;
        Ok(MatchRepo::list_by_season(&self.pool, season_id).await?)
    }

    // ── Lifecycle transitions ────────────────────────────────────────

    /// Open a draft season for team registration.
    pub async fn open_registration(&self, season_id: Uuid) -> EngineResult<Season> {
        let season = require_season(&self.pool, season_id).await?;
        let season = self
            .transition(&season, SeasonStatus::Registration, "open_registration")
            .await?;

        tracing::info!(season_id = %season.id, "Registration opened");
        Ok(season)
    }

    /// Activate a season whose fixtures are complete and whose team count
    /// is within bounds.
    pub async fn activate_season(&self, season_id: Uuid) -> EngineResult<Season> {
        let season = require_season(&self.pool, season_id).await?;

        if season.fixtures_status_id != FixturesStatus::Completed.id() {
            return Err(SeasonError::InvalidStateTransition {
                from: fixtures_state::status_name(season.fixtures_status_id),
                operation: "activate_season",
            }
            .into());
        }
        self.check_team_bounds(&season)?;

        let season = self
            .transition(&season, SeasonStatus::Active, "activate_season")
            .await?;

        tracing::info!(
            season_id = %season.id,
            teams = season.registered_teams_count,
            matches = season.total_matches_planned,
            "Season activated",
        );
        Ok(season)
    }

    /// Complete an active season once every match is terminal or the end
    /// date has passed.
    pub async fn complete_season(&self, season_id: Uuid) -> EngineResult<Season> {
        let season = require_season(&self.pool, season_id).await?;

        let (total, terminal) = MatchRepo::count_with_terminal(&self.pool, season_id).await?;
        let window_over = season.end_date < Utc::now().date_naive();
        if terminal < total && !window_over {
            return Err(SeasonError::Validation(format!(
                "{} of {} matches are still open and the season window has not ended",
                total - terminal,
                total
            ))
            .into());
        }

        let season = self
            .transition(&season, SeasonStatus::Completed, "complete_season")
            .await?;

        tracing::info!(season_id = %season.id, "Season completed");
        Ok(season)
    }

    /// Cancel a season from any non-terminal state, cancelling every
    /// unfinished match with it.
    pub async fn cancel_season(&self, season_id: Uuid, reason: &str) -> EngineResult<Season> {
        let season = require_season(&self.pool, season_id).await?;

        if season_state::is_terminal(season.status_id) {
            return Err(SeasonError::InvalidStateTransition {
                from: season_state::status_name(season.status_id),
                operation: "cancel_season",
            }
            .into());
        }

        match SeasonRepo::cancel_with_matches(&self.pool, season_id, season.version, reason).await?
        {
            Some(season) => {
                tracing::warn!(season_id = %season.id, reason, "Season cancelled");
                Ok(season)
            }
            None => Err(SeasonError::ConcurrentModification.into()),
        }
    }

    // ── Fixture generation pipeline ──────────────────────────────────

    /// Close registration and generate the fixture list.
    ///
    /// Requires the season in `registration` with fixtures `pending` or
    /// `error`. Exactly one concurrent caller can claim the run; the rest
    /// fail fast with `GenerationInProgress`.
    pub async fn close_registration_and_generate_fixtures(
        &self,
        season_id: Uuid,
    ) -> EngineResult<GenerationOutcome> {
        self.run_generation(
            season_id,
            &[FixturesStatus::Pending.id(), FixturesStatus::Error.id()],
            false,
        )
        .await
    }

    /// Throw away previously generated fixtures and regenerate.
    ///
    /// Only allowed while the season is still in `registration` — never
    /// once active. With an unchanged team list the new schedule is
    /// structurally equivalent (same pairing multiset); dates may move
    /// because "now" moved.
    pub async fn regenerate_fixtures(&self, season_id: Uuid) -> EngineResult<GenerationOutcome> {
        self.run_generation(
            season_id,
            &[
                FixturesStatus::Pending.id(),
                FixturesStatus::Error.id(),
                FixturesStatus::Completed.id(),
            ],
            true,
        )
        .await
    }

    /// Run the generation pipeline with no persistence and no status
    /// change: same validation, same fixture set a real run would commit.
    pub async fn preview_fixtures(&self, season_id: Uuid) -> EngineResult<Vec<ScheduledFixture>> {
        let season = require_season(&self.pool, season_id).await?;
        let teams = SeasonTeamRepo::list_active_ordered(&self.pool, season_id).await?;
        Ok(Self::compute_schedule(&season, &teams)?)
    }

    /// Operator recovery: reset a generation attempt stuck in
    /// `generating` beyond [`STALE_GENERATION_INTERVAL_SECS`] to `error`.
    /// A fresh attempt is refused to avoid a double-generation race.
    pub async fn reset_stale_generation(&self, season_id: Uuid) -> EngineResult<Season> {
        let season = require_season(&self.pool, season_id).await?;

        if season.fixtures_status_id != FixturesStatus::Generating.id() {
            return Err(SeasonError::InvalidStateTransition {
                from: fixtures_state::status_name(season.fixtures_status_id),
                operation: "reset_stale_generation",
            }
            .into());
        }

        match SeasonRepo::reset_stale_generation(
            &self.pool,
            season_id,
            STALE_GENERATION_INTERVAL_SECS,
        )
        .await?
        {
            Some(season) => {
                tracing::warn!(season_id = %season.id, "Stale generation attempt reset by operator");
                Ok(season)
            }
            None => Err(SeasonError::Validation(
                "generation attempt is not stale yet; wait for the watchdog interval".into(),
            )
            .into()),
        }
    }

    async fn run_generation(
        &self,
        season_id: Uuid,
        allowed_from: &[StatusId],
        replace_existing: bool,
    ) -> EngineResult<GenerationOutcome> {
        let season = require_season(&self.pool, season_id).await?;

        if season.status_id != SeasonStatus::Registration.id() {
            return Err(SeasonError::InvalidStateTransition {
                from: season_state::status_name(season.status_id),
                operation: "generate_fixtures",
            }
            .into());
        }
        if season.fixtures_status_id == FixturesStatus::Generating.id() {
            return Err(SeasonError::GenerationInProgress.into());
        }
        if !allowed_from.contains(&season.fixtures_status_id) {
            return Err(SeasonError::InvalidStateTransition {
                from: fixtures_state::status_name(season.fixtures_status_id),
                operation: "generate_fixtures",
            }
            .into());
        }
        self.check_team_bounds(&season)?;
        if TournamentFormat::from_id(season.tournament_format) != Some(TournamentFormat::League) {
            return Err(SeasonError::Validation(
                "only the league format can generate fixtures".into(),
            )
            .into());
        }

        let Some(claimed) =
            SeasonRepo::try_begin_generation(&self.pool, season_id, season.version, allowed_from)
                .await?
        else {
            // Lost the race: either another caller claimed the run or the
            // row moved for some other reason. Re-read to tell them apart.
            let current = require_season(&self.pool, season_id).await?;
            return Err(
                if current.fixtures_status_id == FixturesStatus::Generating.id() {
                    SeasonError::GenerationInProgress
                } else {
                    SeasonError::ConcurrentModification
                }
                .into(),
            );
        };

        let teams = SeasonTeamRepo::list_active_ordered(&self.pool, season_id).await?;
        let fixtures = match Self::compute_schedule(&claimed, &teams) {
            Ok(fixtures) => fixtures,
            Err(domain) => {
                SeasonRepo::mark_generation_failed(&self.pool, season_id, &domain.to_string())
                    .await?;
                return Err(domain.into());
            }
        };

        let new_matches: Vec<NewMatch> = fixtures
            .iter()
            .map(|f| NewMatch {
                season_id,
                home_team_id: f.home,
                away_team_id: f.away,
                round_number: f.round as i32,
                match_date: Utc.from_utc_datetime(&f.kickoff),
                venue: None,
            })
            .collect();

        match SeasonRepo::commit_fixtures(
            &self.pool,
            season_id,
            claimed.version,
            &new_matches,
            replace_existing,
        )
        .await
        {
            Ok(Some(season)) => {
                tracing::info!(
                    season_id = %season.id,
                    matches = new_matches.len(),
                    rounds = fixtures.iter().map(|f| f.round).max().unwrap_or(0),
                    "Fixtures generated",
                );
                Ok(GenerationOutcome {
                    season,
                    matches_created: new_matches.len(),
                })
            }
            Ok(None) => {
                SeasonRepo::mark_generation_failed(
                    &self.pool,
                    season_id,
                    "season modified during fixture commit",
                )
                .await?;
                Err(SeasonError::ConcurrentModification.into())
            }
            Err(db_err) => {
                // The transaction rolled back; record the cause so the
                // season surfaces as `error` rather than a stuck claim.
                let _ = SeasonRepo::mark_generation_failed(
                    &self.pool,
                    season_id,
                    &db_err.to_string(),
                )
                .await;
                Err(db_err.into())
            }
        }
    }

    /// The pure pipeline step shared by generation and preview:
    /// registry order → round-robin pairings → calendar placement.
    fn compute_schedule(
        season: &Season,
        teams: &[SeasonTeam],
    ) -> Result<Vec<ScheduledFixture>, SeasonError> {
        let team_ids: Vec<TeamId> = teams.iter().map(|t| t.team_id).collect();
        let pairings = roundrobin::generate(&team_ids, season.rounds_per_pairing)?;
        schedule::place_rounds(&pairings, &season.window())
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn check_team_bounds(&self, season: &Season) -> Result<(), SeasonError> {
        if season.registered_teams_count < season.min_teams {
            return Err(SeasonError::InsufficientTeams {
                registered: season.registered_teams_count,
                min: season.min_teams,
            });
        }
        // The registry prevents this; defense in depth.
        if season.registered_teams_count > season.max_teams {
            return Err(SeasonError::TooManyTeams {
                registered: season.registered_teams_count,
                max: season.max_teams,
            });
        }
        Ok(())
    }

    /// Validate a season transition against the state machine and apply
    /// it with an optimistic version guard.
    async fn transition(
        &self,
        season: &Season,
        to: SeasonStatus,
        operation: &'static str,
    ) -> EngineResult<Season> {
        if !season_state::can_transition(season.status_id, to.id()) {
            return Err(SeasonError::InvalidStateTransition {
                from: season_state::status_name(season.status_id),
                operation,
            }
            .into());
        }

        match SeasonRepo::update_status(
            &self.pool,
            season.id,
            season.version,
            season.status_id,
            to.id(),
        )
        .await?
        {
            Some(season) => Ok(season),
            None => Err(EngineError::Domain(SeasonError::ConcurrentModification)),
        }
    }
}
