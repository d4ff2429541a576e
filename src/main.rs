// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Carbon Tracker API Server
//!
//! Stores user activities with server-computed carbon footprints and serves
//! per-type and time-windowed totals.

use carbon_tracker::{
    config::Config,
    db::FirestoreDb,
    services::{EmissionFactorTable, FootprintCalculator},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Carbon Tracker API");

    // Load emission factors
    let table = match &config.emission_factors_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading emission factors");
            EmissionFactorTable::load_from_file(path)?
        }
        None => EmissionFactorTable::builtin()?,
    };
    tracing::info!(count = table.len(), "Emission factors loaded");
    let calculator = FootprintCalculator::new(Arc::new(table));

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id).await?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        calculator,
    });

    // Build router
    let app = carbon_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("carbon_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
