// ABOUTME: HTTP request handlers for account operations
// ABOUTME: Registration, login, logout and the signed-in user's profile

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use codementor_core::{validate_email, validate_password, validate_username};
use codementor_security::NewUser;
use codementor_storage::StorageError;

use crate::auth::CurrentUser;
use crate::error::{ApiResult, AppError};
use crate::response::{created, ok};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Create an account
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let user = state
        .users
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    info!("Registered user {}", user.id);

    Ok(created(serde_json::json!({
        "message": "User registered successfully",
        "user": user.into_profile(Vec::new(), None),
    })))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::validation("Email and password are required."));
    }

    let user = state
        .users
        .authenticate(&request.email, &request.password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let session = state.sessions.create_session(&user.id).await?;

    info!("User {} logged in", user.id);

    Ok(ok(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    }))
}

/// Revoke the token presented with this request
pub async fn logout(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Response> {
    state.sessions.revoke(&current_user.token).await?;

    info!("User {} logged out", current_user.id);

    Ok(ok(serde_json::json!({"message": "Logged out"})))
}

/// Profile of the signed-in user with history and roadmap attached
pub async fn profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Response> {
    let user = state
        .users
        .get_user(&current_user.id)
        .await
        .map_err(|e| match e {
            // Session outlived its account
            StorageError::NotFound => AppError::Unauthorized,
            other => other.into(),
        })?;
    let history = state.history.list_entries(&user.id).await?;
    let roadmap = state.roadmaps.get_roadmap(&user.id).await?;

    Ok(ok(user.into_profile(history, roadmap)))
}
