// ABOUTME: HTTP request handlers for personalized learning roadmaps
// ABOUTME: Generation through the language model plus sequential day tracking

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;

use codementor_ai::{parse_roadmap, roadmap_prompt};
use codementor_core::{validate_roadmap_request, Roadmap, RoadmapProgress, RoadmapRequest};

use crate::auth::CurrentUser;
use crate::error::{ApiResult, AppError};
use crate::response::ok;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MarkDayRequest {
    pub day: u32,
}

async fn load_roadmap(state: &AppState, user_id: &str) -> ApiResult<Roadmap> {
    state
        .roadmaps
        .get_roadmap(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No roadmap found. Generate one first."))
}

/// Generate a roadmap and make it the user's current one
pub async fn generate_roadmap(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<RoadmapRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    validate_roadmap_request(&request)?;

    info!(
        "Roadmap requested by user {}: {} days of {}",
        current_user.id, request.duration, request.field
    );

    let response = state.model.generate(&roadmap_prompt(&request)).await?;
    let roadmap = parse_roadmap(&response.data, &request);

    state
        .roadmaps
        .replace_roadmap(&current_user.id, &roadmap)
        .await?;

    Ok(ok(roadmap))
}

/// Mark one day complete; days must be completed in order
pub async fn mark_day_complete(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<MarkDayRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let mut roadmap = load_roadmap(&state, &current_user.id).await?;

    roadmap.complete_day(request.day)?;
    state
        .roadmaps
        .set_day_completed(&current_user.id, request.day, true)
        .await?;

    info!(
        "User {} completed roadmap day {}",
        current_user.id, request.day
    );

    Ok(ok(RoadmapProgress::from_roadmap(roadmap)))
}

/// Progress summary of the current roadmap
pub async fn get_roadmap_progress(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Response> {
    let roadmap = load_roadmap(&state, &current_user.id).await?;
    Ok(ok(RoadmapProgress::from_roadmap(roadmap)))
}
