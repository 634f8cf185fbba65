//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step writes (fixture
//! commit, registration count maintenance, cancellation cascades) run in
//! a single transaction here so callers never observe partial state.

pub mod match_repo;
pub mod season_repo;
pub mod season_team_repo;

pub use match_repo::MatchRepo;
pub use season_repo::SeasonRepo;
pub use season_team_repo::SeasonTeamRepo;
