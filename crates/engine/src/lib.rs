//! Orchestration layer for the season engine.
//!
//! [`SeasonLifecycleManager`] owns the season and fixture state machines
//! and drives the generation pipeline (registry → generator → scheduler →
//! persistence); [`SeasonTeamRegistry`] owns team membership. Both are
//! constructed once with an injected pool and passed by reference — there
//! are no process-wide singletons.

pub mod error;
pub mod lifecycle;
pub mod registry;

pub use error::{EngineError, EngineResult};
pub use lifecycle::{GenerationOutcome, SeasonDetails, SeasonLifecycleManager};
pub use registry::SeasonTeamRegistry;

use sideline_core::error::SeasonError;
use sideline_db::models::season::Season;
use sideline_db::repositories::SeasonRepo;
use sideline_db::DbPool;
use uuid::Uuid;

/// Fetch a season or fail with the domain not-found error.
pub(crate) async fn require_season(pool: &DbPool, season_id: Uuid) -> EngineResult<Season> {
    SeasonRepo::find_by_id(pool, season_id)
        .await?
        .ok_or(EngineError::Domain(SeasonError::NotFound {
            entity: "Season",
            id: season_id,
        }))
}
