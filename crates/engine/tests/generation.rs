//! Integration tests for the fixture generation pipeline.

mod common;

use std::collections::HashSet;

use assert_matches::assert_matches;
use chrono::Duration;
use sideline_core::error::SeasonError;
use sideline_core::season::TournamentFormat;
use sideline_db::models::status::{FixturesStatus, MatchStatus, SeasonStatus};
use sideline_db::repositories::{MatchRepo, SeasonRepo};
use sideline_engine::{EngineError, SeasonLifecycleManager};
use sqlx::PgPool;
use uuid::Uuid;

use common::{league_config, register_teams, season_in_registration};

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn insufficient_teams_rejected_and_season_unchanged(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(4, 16)).await;
    register_teams(&pool, season.id, 3).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::InsufficientTeams {
            registered: 3,
            min: 4,
        })
    );

    // The season is untouched: still open, pipeline still pending.
    let season = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    assert_eq!(season.status_id, SeasonStatus::Registration.id());
    assert_eq!(season.fixtures_status_id, FixturesStatus::Pending.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn generation_requires_open_registration(pool: PgPool) {
    let manager = SeasonLifecycleManager::new(pool.clone());
    let season = manager.create_season(league_config(2, 16)).await.unwrap();

    // Still in draft.
    let err = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::InvalidStateTransition { .. })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn knockout_format_cannot_generate(pool: PgPool) {
    let mut config = league_config(2, 16);
    config.tournament_format = TournamentFormat::Knockout;
    let season = season_in_registration(&pool, config).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(SeasonError::Validation(_)));

    // Rejected before the claim: the pipeline never left pending.
    let season = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    assert_eq!(season.fixtures_status_id, FixturesStatus::Pending.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_season_not_found(pool: PgPool) {
    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager
        .close_registration_and_generate_fixtures(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(SeasonError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn four_teams_single_round_robin(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let outcome = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    assert_eq!(outcome.matches_created, 6);
    assert_eq!(
        outcome.season.fixtures_status_id,
        FixturesStatus::Completed.id()
    );
    assert_eq!(outcome.season.total_matches_planned, Some(6));
    assert!(outcome.season.fixtures_generated_at.is_some());
    // Closing registration does not activate the season by itself.
    assert_eq!(outcome.season.status_id, SeasonStatus::Registration.id());

    let matches = MatchRepo::list_by_season(&pool, season.id).await.unwrap();
    assert_eq!(matches.len(), 6);
    assert!(matches
        .iter()
        .all(|m| m.status_id == MatchStatus::Scheduled.id()));

    // Three rounds of two simultaneous matches.
    let rounds: HashSet<i32> = matches.iter().map(|m| m.round_number).collect();
    assert_eq!(rounds, HashSet::from([1, 2, 3]));
    for round in 1..=3 {
        assert_eq!(
            matches.iter().filter(|m| m.round_number == round).count(),
            2
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn double_round_robin_doubles_the_schedule(pool: PgPool) {
    let mut config = league_config(2, 16);
    config.rounds_per_pairing = 2;
    let season = season_in_registration(&pool, config).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let outcome = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    assert_eq!(outcome.matches_created, 12);

    // Every pair meets twice, once per venue role.
    let matches = MatchRepo::list_by_season(&pool, season.id).await.unwrap();
    let ordered: HashSet<(Uuid, Uuid)> = matches
        .iter()
        .map(|m| (m.home_team_id, m.away_team_id))
        .collect();
    assert_eq!(ordered.len(), 12);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn preview_persists_nothing(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let fixtures = manager.preview_fixtures(season.id).await.unwrap();
    assert_eq!(fixtures.len(), 6);

    assert_eq!(MatchRepo::count_by_season(&pool, season.id).await.unwrap(), 0);
    let season = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    assert_eq!(season.fixtures_status_id, FixturesStatus::Pending.id());
}

// ---------------------------------------------------------------------------
// Scheduling window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn window_too_small_records_error_state(pool: PgPool) {
    let mut config = league_config(2, 16);
    // Four teams need three weekly rounds (14 days); give the season 10.
    config.end_date = config.start_date + Duration::days(10);
    let season = season_in_registration(&pool, config).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::ScheduleExceedsSeasonWindow {
            required_days: 14,
            available_days: 10,
        })
    );

    // The failed attempt is recorded, with no partial match rows.
    let season = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    assert_eq!(season.fixtures_status_id, FixturesStatus::Error.id());
    assert!(season.fixtures_error.is_some());
    assert_eq!(MatchRepo::count_by_season(&pool, season.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn retry_after_error_succeeds(pool: PgPool) {
    let mut config = league_config(2, 16);
    config.end_date = config.start_date + Duration::days(10);
    config.match_frequency_days = 7;
    let season = season_in_registration(&pool, config).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();

    // Shrink to a two-team field, whose single round always fits.
    let registry = sideline_engine::SeasonTeamRegistry::new(pool.clone());
    let teams = registry.list_registered_teams(season.id).await.unwrap();
    registry
        .withdraw_team(season.id, teams[3].team_id)
        .await
        .unwrap();
    registry
        .withdraw_team(season.id, teams[2].team_id)
        .await
        .unwrap();

    let outcome = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();
    assert_eq!(outcome.matches_created, 1);
}

// ---------------------------------------------------------------------------
// Mutual exclusion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_generation_fails_fast(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    // First caller claims the run.
    let fresh = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    let claimed = SeasonRepo::try_begin_generation(
        &pool,
        season.id,
        fresh.version,
        &[FixturesStatus::Pending.id()],
    )
    .await
    .unwrap();
    assert!(claimed.is_some());

    // Second caller observes `generating` and fails immediately.
    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Domain(SeasonError::GenerationInProgress));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_claim_check_refuses_fresh_attempt(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 2).await;

    let fresh = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    SeasonRepo::try_begin_generation(
        &pool,
        season.id,
        fresh.version,
        &[FixturesStatus::Pending.id()],
    )
    .await
    .unwrap()
    .unwrap();

    // The claim is seconds old — the watchdog must refuse to reset it.
    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager.reset_stale_generation(season.id).await.unwrap_err();
    assert_matches!(err, EngineError::Domain(SeasonError::Validation(_)));

    let season = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    assert_eq!(season.fixtures_status_id, FixturesStatus::Generating.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn stale_claim_reset_after_watchdog_interval(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 2).await;

    let fresh = SeasonRepo::find_by_id(&pool, season.id).await.unwrap().unwrap();
    SeasonRepo::try_begin_generation(
        &pool,
        season.id,
        fresh.version,
        &[FixturesStatus::Pending.id()],
    )
    .await
    .unwrap()
    .unwrap();

    // Backdate the claim past the watchdog interval.
    sqlx::query("UPDATE seasons SET updated_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(season.id)
        .execute(&pool)
        .await
        .unwrap();

    let manager = SeasonLifecycleManager::new(pool.clone());
    let season = manager.reset_stale_generation(season.id).await.unwrap();
    assert_eq!(season.fixtures_status_id, FixturesStatus::Error.id());
    assert!(season.fixtures_error.is_some());
}

// ---------------------------------------------------------------------------
// Regeneration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn regeneration_is_structurally_idempotent(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 5).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    let pairing_multiset = |matches: &[sideline_db::models::matches::Match]| {
        let mut pairs: Vec<(Uuid, Uuid)> = matches
            .iter()
            .map(|m| {
                if m.home_team_id < m.away_team_id {
                    (m.home_team_id, m.away_team_id)
                } else {
                    (m.away_team_id, m.home_team_id)
                }
            })
            .collect();
        pairs.sort();
        pairs
    };

    let before = MatchRepo::list_by_season(&pool, season.id).await.unwrap();
    let outcome = manager.regenerate_fixtures(season.id).await.unwrap();
    let after = MatchRepo::list_by_season(&pool, season.id).await.unwrap();

    assert_eq!(outcome.matches_created, before.len());
    assert_eq!(after.len(), before.len());
    assert_eq!(pairing_multiset(&before), pairing_multiset(&after));

    // The old rows were replaced, not appended to.
    let before_ids: HashSet<Uuid> = before.iter().map(|m| m.id).collect();
    assert!(after.iter().all(|m| !before_ids.contains(&m.id)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn regeneration_rejected_once_active(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();
    manager.activate_season(season.id).await.unwrap();

    let err = manager.regenerate_fixtures(season.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::InvalidStateTransition { .. })
    );
}

// ---------------------------------------------------------------------------
// Activation, completion, cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn activation_requires_completed_fixtures(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    let err = manager.activate_season(season.id).await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::InvalidStateTransition { .. })
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn activation_after_generation(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    let season = manager.activate_season(season.id).await.unwrap();
    assert_eq!(season.status_id, SeasonStatus::Active.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_rejected_while_matches_open(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();
    manager.activate_season(season.id).await.unwrap();

    let err = manager.complete_season(season.id).await.unwrap_err();
    assert_matches!(err, EngineError::Domain(SeasonError::Validation(_)));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_after_all_matches_terminal(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();
    manager.activate_season(season.id).await.unwrap();

    // The (out-of-scope) result recorder finishes every match.
    sqlx::query("UPDATE matches SET status_id = $2 WHERE season_id = $1")
        .bind(season.id)
        .bind(MatchStatus::Completed.id())
        .execute(&pool)
        .await
        .unwrap();

    let season = manager.complete_season(season.id).await.unwrap();
    assert_eq!(season.status_id, SeasonStatus::Completed.id());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancellation_cascades_to_open_matches(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    let season = manager
        .cancel_season(season.id, "venue unavailable")
        .await
        .unwrap();
    assert_eq!(season.status_id, SeasonStatus::Cancelled.id());
    assert_eq!(season.cancel_reason.as_deref(), Some("venue unavailable"));

    let matches = MatchRepo::list_by_season(&pool, season.id).await.unwrap();
    assert!(matches
        .iter()
        .all(|m| m.status_id == MatchStatus::Cancelled.id()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancellation_rejected_from_terminal_state(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager.cancel_season(season.id, "first").await.unwrap();

    let err = manager.cancel_season(season.id, "second").await.unwrap_err();
    assert_matches!(
        err,
        EngineError::Domain(SeasonError::InvalidStateTransition { .. })
    );
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn count_mismatch_flagged_on_read(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    // Simulate a torn write by removing one persisted match.
    sqlx::query(
        "DELETE FROM matches WHERE id = \
         (SELECT id FROM matches WHERE season_id = $1 LIMIT 1)",
    )
    .bind(season.id)
    .execute(&pool)
    .await
    .unwrap();

    let details = manager.season_details(season.id).await.unwrap();
    assert_eq!(
        details.season.fixtures_status_id,
        FixturesStatus::Error.id()
    );
    assert!(details
        .season
        .fixtures_error
        .as_deref()
        .unwrap()
        .contains("mismatch"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn consistent_season_not_flagged(pool: PgPool) {
    let season = season_in_registration(&pool, league_config(2, 16)).await;
    let teams = register_teams(&pool, season.id, 4).await;

    let manager = SeasonLifecycleManager::new(pool.clone());
    manager
        .close_registration_and_generate_fixtures(season.id)
        .await
        .unwrap();

    let details = manager.season_details(season.id).await.unwrap();
    assert_eq!(
        details.season.fixtures_status_id,
        FixturesStatus::Completed.id()
    );
    assert_eq!(details.teams.len(), teams.len());
}
