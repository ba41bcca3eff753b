//! Application setup and initialization
//!
//! Kept out of main.rs so integration tests can build the same router.

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use xtract_core::Config;
use xtract_services::ConversionService;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(AppState, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let state = build_state(config)?;
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Build the shared state: the conversion service and the configuration it came from.
pub fn build_state(config: Config) -> Result<AppState> {
    let conversion =
        ConversionService::from_config(&config).context("Failed to create conversion service")?;

    tracing::info!(
        input_types = %conversion.supported_types().media_types().join(","),
        output_format = %conversion.output_format(),
        scratch_root = %conversion.scratch_root().display(),
        "Conversion service ready"
    );

    Ok(AppState::new(config, conversion))
}
