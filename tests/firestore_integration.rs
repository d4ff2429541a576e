// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. They are skipped otherwise.
//!
//! Every test works under a fresh user id, so runs do not interfere.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use carbon_tracker::config::Config;
use carbon_tracker::models::{ActivityInput, ActivityType, Amount, DateWindow, User};
use carbon_tracker::routes::create_router;
use carbon_tracker::services::activity::{apply_update, build_activity};
use carbon_tracker::services::aggregator::{summarize, total_in_window};
use carbon_tracker::AppState;
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

mod common;
use common::{body_json, test_calculator, test_db};

fn test_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: email.to_string(),
        password_hash: "pbkdf2-sha256$100000$c2FsdA$aGFzaA".to_string(),
        created_at: "2024-01-15T10:00:00Z".to_string(),
        last_login: None,
    }
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

fn input(activity_type: &str, category: &str, value: f64, date: DateTime<Utc>) -> ActivityInput {
    ActivityInput {
        activity_type: activity_type.to_string(),
        category: category.to_string(),
        description: format!("{} {}", value, category),
        amount: Amount {
            value,
            unit: "km".to_string(),
        },
        date: Some(date),
        location: None,
        metadata: None,
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_create_and_lookup() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email();
    let user = test_user(&email);

    assert!(db.get_user(&user.id).await.unwrap().is_none());
    assert!(db.find_user_by_email(&email).await.unwrap().is_none());

    db.upsert_user(&user).await.unwrap();

    let by_id = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(by_id.email, email);
    assert_eq!(by_id.name, "Test User");

    let by_email = db.find_user_by_email(&email).await.unwrap().unwrap();
    assert_eq!(by_email.id, user.id);

    println!("✓ User created and found: user_id={}", user.id);
}

#[tokio::test]
async fn test_user_update_keeps_created_at() {
    require_emulator!();

    let db = test_db().await;
    let mut user = test_user(&unique_email());
    db.upsert_user(&user).await.unwrap();

    user.last_login = Some("2024-02-01T09:00:00Z".to_string());
    db.upsert_user(&user).await.unwrap();

    let fetched = db.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(fetched.created_at, "2024-01-15T10:00:00Z");
    assert_eq!(fetched.last_login.as_deref(), Some("2024-02-01T09:00:00Z"));
}

#[tokio::test]
async fn test_email_claim_has_single_owner() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email();
    let first = Uuid::new_v4();

    assert!(db.claim_email(&email, &first).await.unwrap());
    assert!(!db.claim_email(&email, &Uuid::new_v4()).await.unwrap());

    db.release_email(&email).await.unwrap();
    assert!(db.claim_email(&email, &first).await.unwrap());
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVITY TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_activity_crud() {
    require_emulator!();

    let db = test_db().await;
    let calculator = test_calculator();
    let user_id = Uuid::new_v4();

    let activity =
        build_activity(&calculator, user_id, input("transport", "car", 100.0, day(1)), day(1))
            .unwrap();
    db.set_activity(&activity).await.unwrap();

    let fetched = db.get_activity(&activity.id).await.unwrap().unwrap();
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.activity_type, ActivityType::Transport);
    assert_eq!(fetched.carbon_footprint.value, Decimal::new(20, 0));
    assert_eq!(fetched.date, day(1));

    let updated = apply_update(&calculator, fetched, input("transport", "bus", 100.0, day(2)), day(2))
        .unwrap();
    db.set_activity(&updated).await.unwrap();

    let fetched = db.get_activity(&activity.id).await.unwrap().unwrap();
    assert_eq!(fetched.category, "bus");
    assert_eq!(fetched.carbon_footprint.value, Decimal::new(10, 0));
    assert_eq!(fetched.created_at, activity.created_at);

    db.delete_activity(&activity.id).await.unwrap();
    assert!(db.get_activity(&activity.id).await.unwrap().is_none());

    println!("✓ Activity CRUD verified: activity_id={}", activity.id);
}

#[tokio::test]
async fn test_list_activities_pagination_and_filter() {
    require_emulator!();

    let db = test_db().await;
    let calculator = test_calculator();
    let user_id = Uuid::new_v4();

    let inputs = [
        input("transport", "car", 10.0, day(1)),
        input("food", "beef", 1.0, day(2)),
        input("transport", "train", 10.0, day(3)),
        input("energy", "electricity", 5.0, day(4)),
    ];
    for i in inputs {
        let activity = build_activity(&calculator, user_id, i, day(5)).unwrap();
        db.set_activity(&activity).await.unwrap();
    }

    // Newest first
    let first_page = db
        .list_activities_for_user(&user_id, None, 2, 0)
        .await
        .unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].date, day(4));
    assert_eq!(first_page[1].date, day(3));

    let second_page = db
        .list_activities_for_user(&user_id, None, 2, 2)
        .await
        .unwrap();
    assert_eq!(second_page.len(), 2);
    assert_eq!(second_page[1].date, day(1));

    let transport = db
        .list_activities_for_user(&user_id, Some(ActivityType::Transport), 10, 0)
        .await
        .unwrap();
    assert_eq!(transport.len(), 2);
    assert!(transport
        .iter()
        .all(|a| a.activity_type == ActivityType::Transport));
}

#[tokio::test]
async fn test_windowed_query_matches_in_memory_total() {
    require_emulator!();

    let db = test_db().await;
    let calculator = test_calculator();
    let user_id = Uuid::new_v4();

    for (category, value, d) in [("car", 52.5, 1), ("bus", 52.5, 10), ("plane", 13.32, 20)] {
        let activity = build_activity(
            &calculator,
            user_id,
            input("transport", category, value, day(d)),
            day(d),
        )
        .unwrap();
        db.set_activity(&activity).await.unwrap();
    }

    let everything = db
        .get_activities_in_window(&user_id, &DateWindow::unbounded())
        .await
        .unwrap();
    assert_eq!(everything.len(), 3);

    let window = DateWindow::new(Some(day(5)), Some(day(25)));
    let windowed = db.get_activities_in_window(&user_id, &window).await.unwrap();
    assert_eq!(windowed.len(), 2);

    // Same answer whether the database or the aggregator applies the window.
    assert_eq!(
        total_in_window(&windowed, &window),
        total_in_window(&everything, &window)
    );
    assert_eq!(summarize(&windowed).total, total_in_window(&everything, &window));
}

// ═══════════════════════════════════════════════════════════════════════════
// END-TO-END
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_register_log_and_total() {
    require_emulator!();

    let config = Config::test_default();
    let signing_key = config.jwt_signing_key.clone();
    let state = Arc::new(AppState {
        config,
        db: test_db().await,
        calculator: test_calculator(),
    });
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "name": "Alice",
                        "email": unique_email(),
                        "password": "correct horse battery"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("carbon_token="));
    assert!(set_cookie.contains("HttpOnly"));
    let body = body_json(response).await;
    assert!(body["user"].get("passwordHash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/activities")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "type": "food",
                        "category": "beef",
                        "description": "Burger",
                        "amount": { "value": 0.5, "unit": "kg" },
                        "date": "2024-03-10T19:00:00Z",
                        "carbonFootprint": { "value": 0, "unit": "kgCO2e" }
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["carbonFootprint"]["value"].as_f64(), Some(13.5));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/carbon/total?startDate=2024-03-01&endDate=2024-03-10")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let total = body_json(response).await;
    assert_eq!(total["total"]["value"].as_f64(), Some(13.5));
    assert_eq!(total["byType"][0]["type"], "food");
    assert_eq!(total["byType"][0]["count"], 1);

    // Another user cannot see the activity.
    let stranger = common::create_test_jwt(&Uuid::new_v4(), &signing_key);
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/activities/{}", created["id"].as_str().unwrap()))
                .header(header::AUTHORIZATION, format!("Bearer {}", stranger))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_registration_same_email() {
    require_emulator!();

    let state = Arc::new(AppState {
        config: Config::test_default(),
        db: test_db().await,
        calculator: test_calculator(),
    });
    let app = create_router(state);
    let email = unique_email();

    let register = |name: &str| {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "name": name,
                    "email": email,
                    "password": "correct horse battery"
                })
                .to_string(),
            ))
            .unwrap();
        app.clone().oneshot(request)
    };

    let (first, second) = tokio::join!(register("First"), register("Second"));
    let mut statuses = [first.unwrap().status(), second.unwrap().status()];
    statuses.sort();

    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    println!("✓ Only one registration won for {}", email);
}
