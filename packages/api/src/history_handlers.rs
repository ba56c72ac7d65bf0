// ABOUTME: HTTP request handlers for a user's review and code generation history
// ABOUTME: Entries are appended in order and deleted by their position

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};
use tracing::info;

use codementor_core::HistoryInput;

use crate::auth::CurrentUser;
use crate::error::{ApiResult, AppError};
use crate::response::{created, ok};
use crate::state::AppState;

/// Append an entry to the signed-in user's history
pub async fn add_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<HistoryInput>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(input) = payload?;

    let entry = state
        .history
        .add_entry(&current_user.id, input.into_payload())
        .await?;

    info!(
        "Added {} history entry {} for user {}",
        entry.payload.kind(),
        entry.id,
        current_user.id
    );

    Ok(created(entry))
}

/// List the signed-in user's history in insertion order
pub async fn list_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Response> {
    let entries = state.history.list_entries(&current_user.id).await?;
    Ok(ok(entries))
}

/// Delete the entry at a zero-based position
pub async fn delete_history(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(index): Path<String>,
) -> ApiResult<Response> {
    let index: usize = index
        .parse()
        .map_err(|_| AppError::validation("Invalid history index."))?;

    if !state.history.delete_at(&current_user.id, index).await? {
        return Err(AppError::validation("Invalid history index."));
    }

    info!("Deleted history entry {} for user {}", index, current_user.id);

    let entries = state.history.list_entries(&current_user.id).await?;
    Ok(ok(entries))
}
