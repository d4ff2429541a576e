// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity CRUD routes (require authentication via JWT).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivityInput, ActivityResponse, ActivityType, AggregateSummary};
use crate::services::activity::{apply_update, build_activity};
use crate::services::aggregator::summarize;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route("/api/activities/stats", get(get_stats))
        .route(
            "/api/activities/{id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivitiesQuery {
    /// Filter by activity type
    #[serde(rename = "type")]
    activity_type: Option<String>,
    /// Pagination: page number (1-indexed)
    #[serde(default = "default_page")]
    page: u32,
    /// Pagination: items per page
    #[serde(default = "default_per_page")]
    per_page: u32,
}

fn default_page() -> u32 {
    1
}
fn default_per_page() -> u32 {
    20
}

const MAX_PER_PAGE: u32 = 100;

/// One page of activities, newest first.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesPage {
    pub activities: Vec<ActivityResponse>,
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

/// Resolved pagination window.
#[derive(Debug, PartialEq, Eq)]
struct PageRequest {
    page: u32,
    per_page: u32,
    offset: u32,
}

fn page_request(page: u32, per_page: u32) -> Result<PageRequest> {
    if page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| AppError::BadRequest(format!("Page {} is out of range", page)))?;

    Ok(PageRequest {
        page,
        per_page,
        offset,
    })
}

fn parse_type_filter(raw: Option<&str>) -> Result<Option<ActivityType>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<ActivityType>()
                .map_err(|e| AppError::BadRequest(format!("Invalid 'type' parameter: {}", e)))
        })
        .transpose()
}

/// Activity ids are UUIDs; anything else cannot name an existing record.
fn parse_activity_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("Activity {} not found", raw)))
}

/// Fetch an activity, hiding records that belong to someone else.
async fn load_owned(state: &AppState, user: &AuthUser, id: &Uuid) -> Result<Activity> {
    match state.db.get_activity(id).await? {
        Some(activity) if activity.user_id == user.user_id => Ok(activity),
        Some(_) => {
            tracing::warn!(
                user_id = %user.user_id,
                activity_id = %id,
                "Attempt to access another user's activity"
            );
            Err(AppError::NotFound(format!("Activity {} not found", id)))
        }
        None => Err(AppError::NotFound(format!("Activity {} not found", id))),
    }
}

/// List the user's activities with optional type filter.
async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesPage>> {
    let activity_type = parse_type_filter(query.activity_type.as_deref())?;
    let page = page_request(query.page, query.per_page)?;

    // One extra row tells us whether another page exists.
    let mut activities = state
        .db
        .list_activities_for_user(
            &user.user_id,
            activity_type,
            page.per_page + 1,
            page.offset,
        )
        .await?;

    let has_more = activities.len() > page.per_page as usize;
    activities.truncate(page.per_page as usize);

    Ok(Json(ActivitiesPage {
        activities: activities.into_iter().map(ActivityResponse::from).collect(),
        page: page.page,
        per_page: page.per_page,
        has_more,
    }))
}

/// Log a new activity. The footprint is computed here, never taken from the client.
async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ActivityInput>,
) -> Result<(StatusCode, Json<ActivityResponse>)> {
    let activity = build_activity(&state.calculator, user.user_id, input, chrono::Utc::now())?;
    state.db.set_activity(&activity).await?;

    tracing::info!(
        user_id = %user.user_id,
        activity_id = %activity.id,
        activity_type = %activity.activity_type,
        footprint = %activity.carbon_footprint.value,
        "Activity created"
    );

    Ok((StatusCode::CREATED, Json(activity.into())))
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ActivityResponse>> {
    let id = parse_activity_id(&id)?;
    let activity = load_owned(&state, &user, &id).await?;
    Ok(Json(activity.into()))
}

/// Replace an activity's fields and recompute its footprint.
async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(input): Json<ActivityInput>,
) -> Result<Json<ActivityResponse>> {
    let id = parse_activity_id(&id)?;
    let existing = load_owned(&state, &user, &id).await?;

    let updated = apply_update(&state.calculator, existing, input, chrono::Utc::now())?;
    state.db.set_activity(&updated).await?;

    tracing::info!(
        user_id = %user.user_id,
        activity_id = %updated.id,
        footprint = %updated.carbon_footprint.value,
        "Activity updated"
    );

    Ok(Json(updated.into()))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_activity_id(&id)?;
    load_owned(&state, &user, &id).await?;
    state.db.delete_activity(&id).await?;

    tracing::info!(user_id = %user.user_id, activity_id = %id, "Activity deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Per-type totals across all of the user's activities.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AggregateSummary>> {
    let activities = state
        .db
        .get_activities_in_window(&user.user_id, &crate::models::DateWindow::unbounded())
        .await?;

    tracing::debug!(user_id = %user.user_id, count = activities.len(), "Summarizing activities");

    Ok(Json(summarize(&activities)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_caps() {
        assert_eq!(
            page_request(1, 20).unwrap(),
            PageRequest {
                page: 1,
                per_page: 20,
                offset: 0
            }
        );
        assert_eq!(
            page_request(3, 500).unwrap(),
            PageRequest {
                page: 3,
                per_page: MAX_PER_PAGE,
                offset: 200
            }
        );
        assert_eq!(
            page_request(2, 0).unwrap(),
            PageRequest {
                page: 2,
                per_page: 1,
                offset: 1
            }
        );
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(page_request(0, 10), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_page_request_overflow() {
        assert!(matches!(
            page_request(u32::MAX, MAX_PER_PAGE),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_type_filter() {
        assert_eq!(parse_type_filter(None).unwrap(), None);
        assert_eq!(parse_type_filter(Some("")).unwrap(), None);
        assert_eq!(
            parse_type_filter(Some("transportation")).unwrap(),
            Some(ActivityType::Transport)
        );
        assert!(matches!(
            parse_type_filter(Some("spaceship")),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_parse_activity_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_activity_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_activity_id("not-a-uuid"),
            Err(AppError::NotFound(_))
        ));
    }
}
