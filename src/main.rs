//! HR operations API server.
//!
//! Reads `engine.yaml` from `HRMS_CONFIG_DIR` (default `./config`) and
//! serves the REST API on the configured address.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hrms_engine::api::{AppState, create_router};
use hrms_engine::config::ConfigLoader;

const CONFIG_DIR_VAR: &str = "HRMS_CONFIG_DIR";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(error = %message, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config_dir = std::env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "./config".to_string());
    let loader = ConfigLoader::load(&config_dir).map_err(|e| e.to_string())?;
    let bind_address = loader.config().server.bind_address.clone();
    let seeded = loader.config().seed.employees.len();

    let state = AppState::new(loader).map_err(|e| e.to_string())?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", bind_address, e))?;
    info!(
        address = %bind_address,
        config_dir = %config_dir,
        seeded_employees = seeded,
        "HR operations API listening"
    );

    axum::serve(listener, router)
        .await
        .map_err(|e| format!("Server error: {}", e))
}
