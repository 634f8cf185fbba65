//! Route definitions for the `/seasons` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{fixtures, seasons, teams};
use crate::state::AppState;

/// Routes mounted at `/seasons`.
///
/// ```text
/// POST   /                              -> create_season
/// GET    /?league_id=...                -> list_seasons
/// GET    /{id}                          -> get_season
/// POST   /{id}/registration/open        -> open_registration
/// POST   /{id}/teams                    -> register_team
/// GET    /{id}/teams                    -> list_teams
/// DELETE /{id}/teams/{team_id}          -> withdraw_team
/// POST   /{id}/fixtures/generate        -> generate_fixtures
/// POST   /{id}/fixtures/regenerate      -> regenerate_fixtures
/// GET    /{id}/fixtures/preview         -> preview_fixtures
/// POST   /{id}/fixtures/reset           -> reset_stale_generation
/// POST   /{id}/activate                 -> activate_season
/// POST   /{id}/complete                 -> complete_season
/// POST   /{id}/cancel                   -> cancel_season
/// GET    /{id}/matches                  -> list_matches
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(seasons::create_season).get(seasons::list_seasons))
        .route("/{id}", get(seasons::get_season))
        .route(
            "/{id}/registration/open",
            post(seasons::open_registration),
        )
        .route("/{id}/teams", post(teams::register_team).get(teams::list_teams))
        .route("/{id}/teams/{team_id}", delete(teams::withdraw_team))
        .route("/{id}/fixtures/generate", post(fixtures::generate_fixtures))
        .route(
            "/{id}/fixtures/regenerate",
            post(fixtures::regenerate_fixtures),
        )
        .route("/{id}/fixtures/preview", get(fixtures::preview_fixtures))
        .route("/{id}/fixtures/reset", post(fixtures::reset_stale_generation))
        .route("/{id}/activate", post(seasons::activate_season))
        .route("/{id}/complete", post(seasons::complete_season))
        .route("/{id}/cancel", post(seasons::cancel_season))
        .route("/{id}/matches", get(fixtures::list_matches))
}
