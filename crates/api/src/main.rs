use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sideline_api::config::ServerConfig;
use sideline_api::router::build_app_router;
use sideline_api::state::AppState;
use sideline_engine::{SeasonLifecycleManager, SeasonTeamRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sideline_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL")?;

    let pool = sideline_db::create_pool(&database_url).await?;
    tracing::info!("Database connection pool created");

    sideline_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    sideline_db::run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Engine services (constructed once, injected everywhere) ---
    let lifecycle = Arc::new(SeasonLifecycleManager::new(pool.clone()));
    let registry = Arc::new(SeasonTeamRegistry::new(pool.clone()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        lifecycle,
        registry,
    };

    // --- Router & server ---
    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Season engine API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
