// ABOUTME: HTTP request handlers for code review and code generation
// ABOUTME: Builds the prompt, calls the language model, and shapes its reply

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;

use codementor_ai::{codegen_prompt, parse_generated_code, parse_review, review_prompt};

use crate::auth::CurrentUser;
use crate::error::{ApiResult, AppError};
use crate::response::ok;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub code: Option<String>,
}

#[derive(Deserialize)]
pub struct GenerateCodeRequest {
    pub problem: Option<String>,
    pub language: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Review a code snippet
pub async fn get_review(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let code = required(request.code).ok_or_else(|| AppError::validation("Code is required."))?;

    info!(
        "Review requested by user {} ({} chars)",
        current_user.id,
        code.len()
    );

    let response = state.model.generate(&review_prompt(&code)).await?;

    info!(
        "Review completed with model {}: {} tokens",
        state.model.model(),
        response.usage.total_tokens()
    );

    Ok(ok(parse_review(&response.data)))
}

/// Generate a code snippet for a problem statement
pub async fn generate_code(
    State(state): State<AppState>,
    current_user: CurrentUser,
    payload: Result<Json<GenerateCodeRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let (Some(problem), Some(language)) = (required(request.problem), required(request.language))
    else {
        return Err(AppError::validation(
            "Problem statement and language are required.",
        ));
    };

    info!(
        "Code generation requested by user {} in {}",
        current_user.id, language
    );

    let response = state
        .model
        .generate(&codegen_prompt(&problem, &language))
        .await?;

    info!(
        "Code generation completed with model {}: {} tokens",
        state.model.model(),
        response.usage.total_tokens()
    );

    Ok(ok(parse_generated_code(&response.data)))
}
