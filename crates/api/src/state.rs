use std::sync::Arc;

use sideline_engine::{SeasonLifecycleManager, SeasonTeamRegistry};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`). The engine services
/// are constructed once at startup and injected here — no globals.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sideline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Season lifecycle manager (state machine + generation pipeline).
    pub lifecycle: Arc<SeasonLifecycleManager>,
    /// Team registration registry.
    pub registry: Arc<SeasonTeamRegistry>,
}
