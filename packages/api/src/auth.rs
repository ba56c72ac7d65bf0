// ABOUTME: Authentication context for API requests
// ABOUTME: Resolves the Authorization bearer token to the signed-in user

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Current authenticated user
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    /// The bearer token presented with this request, kept for logout
    pub token: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let Some(token) = bearer_token(&parts.headers).map(str::to_string) else {
            debug!(path = %parts.uri.path(), "Missing bearer token");
            return Err(AppError::Unauthorized);
        };

        let session = state
            .sessions
            .resolve(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Self {
            id: session.user_id,
            token,
        })
    }
}
