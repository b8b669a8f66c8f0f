use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let state = AppState::new(config)?;
    let sweeper = state.start_session_sweeper();

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes, &state.config.server)?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check against the session store
    let server = state.config.server.clone();
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting blueprint API with graceful shutdown (30s timeout)");

    create_production_app(app, &server, Duration::from_secs(30), async move {
        // File-backed sessions are flushed on every write; nothing to close
        sweeper.abort();
        drop(state);
        info!("Session store released");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Blueprint API shutdown complete");
    Ok(())
}
