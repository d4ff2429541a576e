// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration, login and profile routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie, AuthUser};
use crate::models::{User, UserResponse};
use crate::services::password::{hash_password, verify_password};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Auth routes that need a session. Mounted behind `require_auth`.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/api/me", get(get_me))
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Session token plus the user it belongs to.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new account and start a session.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    req.validate()?;
    let email = normalize_email(&req.email);

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {}", e)))??;

    let user = User {
        id: Uuid::new_v4(),
        name: req.name.trim().to_string(),
        email,
        password_hash,
        created_at: format_utc_rfc3339(chrono::Utc::now()),
        last_login: None,
    };

    if !state.db.claim_email(&user.email, &user.id).await? {
        tracing::info!("Registration rejected: email already registered");
        return Err(AppError::BadRequest("User already exists".to_string()));
    }

    if let Err(e) = state.db.upsert_user(&user).await {
        if let Err(release_err) = state.db.release_email(&user.email).await {
            tracing::error!(user_id = %user.id, error = %release_err, "Failed to release email claim");
        }
        return Err(e);
    }

    tracing::info!(user_id = %user.id, "User registered");

    let token = session_token(&state, &user.id)?;
    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.session_ttl_hours,
        secure_cookies(&state),
    ));
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Log in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()?;
    let email = normalize_email(&req.email);

    let Some(mut user) = state.db.find_user_by_email(&email).await? else {
        return Err(AppError::InvalidCredentials);
    };

    let password = req.password;
    let stored = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check task failed: {}", e)))?;

    if !valid {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    user.last_login = Some(format_utc_rfc3339(chrono::Utc::now()));
    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    let token = session_token(&state, &user.id)?;
    let jar = jar.add(session_cookie(
        token.clone(),
        state.config.session_ttl_hours,
        secure_cookies(&state),
    ));
    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Clear the session cookie. Bearer tokens simply expire.
async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    (StatusCode::NO_CONTENT, jar.remove(removal_cookie()))
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(profile.into()))
}

fn session_token(state: &AppState, user_id: &Uuid) -> Result<String> {
    create_jwt(
        user_id,
        &state.config.jwt_signing_key,
        state.config.session_ttl_hours,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
}

/// Only mark cookies `Secure` when the frontend itself is served over https.
fn secure_cookies(state: &AppState) -> bool {
    state.config.frontend_url.starts_with("https://")
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
