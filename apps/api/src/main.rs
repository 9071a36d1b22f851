//! Relevar API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use relevar_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, RunMode};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    api_config::init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url, config.database_max_connections).await?;
    let app_state = build_app_state(pool);

    match config.run_mode {
        RunMode::MigrateOnly => {
            info!("database migrations applied successfully");
            return Ok(());
        }
        RunMode::CreateSuperuser { ref username } => {
            let account = app_state.user_service.bootstrap_superuser(username).await?;
            info!(user_id = %account.id, "superuser created");
            println!("{}", account.id);
            return Ok(());
        }
        RunMode::Serve => {}
    }

    let app = build_router(app_state, &config.frontend_url)?;
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "relevar-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
