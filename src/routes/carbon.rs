// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Footprint calculation and totals.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivityType, Amount, CarbonFootprint, DateWindow, TypeTotal};
use crate::services::aggregator::{summarize, total_in_window};
use crate::services::{EmissionFactor, EmissionFactorTable};
use crate::time_utils::{format_utc_rfc3339, parse_date_bound, BoundSide};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/carbon/factors", get(get_factors))
        .route("/api/carbon/calculate", post(calculate))
        .route("/api/carbon/total", get(get_total))
}

/// Emission factor table, type -> category -> `{ factor, unit }`.
async fn get_factors(State(state): State<Arc<AppState>>) -> Json<EmissionFactorTable> {
    Json(state.calculator.table().clone())
}

// ─── Preview Calculation ─────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 32))]
    pub activity_type: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(nested)]
    pub amount: Amount,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CalculationDetails {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub category: String,
    pub amount: Amount,
    pub emission_factor: EmissionFactor,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    pub carbon_footprint: CarbonFootprint,
    pub details: CalculationDetails,
}

/// Compute a footprint without storing anything.
async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>> {
    req.validate()?;

    let estimate = state
        .calculator
        .estimate(&req.activity_type, &req.category, req.amount.value)?;

    Ok(Json(CalculateResponse {
        carbon_footprint: estimate.footprint,
        details: CalculationDetails {
            activity_type: estimate.activity_type,
            category: req.category,
            amount: req.amount,
            emission_factor: estimate.factor,
        },
    }))
}

// ─── Windowed Total ──────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalQuery {
    /// Inclusive lower bound (RFC3339 or YYYY-MM-DD)
    #[serde(alias = "start")]
    start_date: Option<String>,
    /// Inclusive upper bound (RFC3339 or YYYY-MM-DD)
    #[serde(alias = "end")]
    end_date: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct TotalResponse {
    pub total: CarbonFootprint,
    pub by_type: Vec<TypeTotal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

fn parse_bound(
    raw: Option<&str>,
    side: BoundSide,
    name: &str,
) -> Result<Option<chrono::DateTime<chrono::Utc>>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| {
            parse_date_bound(s, side).ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid '{}' parameter: must be RFC3339 datetime or YYYY-MM-DD",
                    name
                ))
            })
        })
        .transpose()
}

fn parse_window(query: &TotalQuery) -> Result<DateWindow> {
    let start = parse_bound(query.start_date.as_deref(), BoundSide::Start, "startDate")?;
    let end = parse_bound(query.end_date.as_deref(), BoundSide::End, "endDate")?;

    if start.is_some() != end.is_some() {
        return Err(AppError::BadRequest(
            "'startDate' and 'endDate' must be given together".to_string(),
        ));
    }

    let window = DateWindow::new(start, end);
    if window.is_inverted() {
        return Err(AppError::BadRequest(
            "'startDate' must not be after 'endDate'".to_string(),
        ));
    }
    Ok(window)
}

/// Total footprint of the user's activities dated inside the window.
async fn get_total(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<TotalQuery>,
) -> Result<Json<TotalResponse>> {
    let window = parse_window(&query)?;

    let activities = state
        .db
        .get_activities_in_window(&user.user_id, &window)
        .await?;

    // Total and breakdown cover the same in-window set.
    let total = total_in_window(&activities, &window);
    let in_window: Vec<_> = activities
        .into_iter()
        .filter(|a| window.contains(&a.date))
        .collect();
    let summary = summarize(&in_window);

    tracing::debug!(
        user_id = %user.user_id,
        bounded = window.is_bounded(),
        count = in_window.len(),
        total = %total.value,
        "Computed windowed total"
    );

    Ok(Json(TotalResponse {
        total,
        by_type: summary.by_type,
        start: window.start().map(format_utc_rfc3339),
        end: window.end().map(format_utc_rfc3339),
    }))
}
