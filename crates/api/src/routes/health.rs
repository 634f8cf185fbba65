//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// Routes mounted at the root (outside `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
///
/// Liveness probe including a database connectivity check.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_healthy = sideline_db::health_check(&state.pool).await.is_ok();

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}
