use axum_helpers::{cors_layer_from_env, create_production_app, create_router};
use core_config::tracing::{init_tracing, install_color_eyre};
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

    let config = Config::from_env()?;

    init_tracing(&config.logging);

    info!(
        name = config.app.name,
        version = config.app.version,
        environment = ?config.environment,
        storage = %config.storage,
        "Starting users API"
    );

    let state = AppState::connect(config).await?;

    // create_router adds docs and middleware around the composed routes
    let router = create_router::<openapi::ApiDoc>(api::routes(&state), cors_layer_from_env()?);

    let server = state.config.server.clone();
    create_production_app(router, &server, state.close())
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Users API shutdown complete");
    Ok(())
}
