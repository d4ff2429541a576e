// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Carbon Tracker: log everyday activities and track their carbon footprint
//!
//! This crate provides the emission factor table, the footprint calculator,
//! per-type aggregation, and the backend API built on top of them.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::FootprintCalculator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub calculator: FootprintCalculator,
}
