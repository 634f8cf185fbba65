//! Shared helpers for engine integration tests.

use chrono::{Duration, NaiveTime, Utc};
use sideline_core::season::{SeasonConfig, TournamentFormat};
use sideline_db::models::season::Season;
use sideline_engine::{SeasonLifecycleManager, SeasonTeamRegistry};
use sqlx::PgPool;
use uuid::Uuid;

/// A league-format config with a scheduling window wide enough for any
/// field size these tests use.
pub fn league_config(min_teams: i32, max_teams: i32) -> SeasonConfig {
    let start = Utc::now().date_naive() + Duration::days(30);
    SeasonConfig {
        league_id: Uuid::new_v4(),
        name: "Test League".to_string(),
        season_year: 2026,
        tournament_format: TournamentFormat::League,
        start_date: start,
        end_date: start + Duration::days(180),
        registration_deadline: None,
        match_frequency_days: 7,
        preferred_match_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        min_teams,
        max_teams,
        rounds_per_pairing: 1,
        points_for_win: 3,
        points_for_draw: 1,
        points_for_loss: 0,
        allow_draws: true,
        home_away_balance_required: true,
    }
}

/// Create a season and open it for registration.
pub async fn season_in_registration(pool: &PgPool, config: SeasonConfig) -> Season {
    let manager = SeasonLifecycleManager::new(pool.clone());
    let season = manager.create_season(config).await.unwrap();
    manager.open_registration(season.id).await.unwrap()
}

/// Register `n` fresh teams, returning their ids in registration order.
pub async fn register_teams(pool: &PgPool, season_id: Uuid, n: usize) -> Vec<Uuid> {
    let registry = SeasonTeamRegistry::new(pool.clone());
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        let team_id = Uuid::new_v4();
        registry.register_team(season_id, team_id).await.unwrap();
        ids.push(team_id);
    }
    ids
}
