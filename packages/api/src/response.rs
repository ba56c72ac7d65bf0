// ABOUTME: Shared API response types
// ABOUTME: Provides the success envelope used by all API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            data,
        }
    }
}

/// 200 OK with the success envelope
pub fn ok<T: Serialize>(data: T) -> Response {
    ResponseJson(ApiResponse::success(data)).into_response()
}

/// 201 Created with the success envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, ResponseJson(ApiResponse::success(data))).into_response()
}
