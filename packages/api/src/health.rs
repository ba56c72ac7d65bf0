// ABOUTME: Liveness endpoints
// ABOUTME: Plain-text root greeting and a JSON health report including database reachability

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

pub async fn root() -> &'static str {
    "Hello World"
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Health check database probe failed: {}", e);
            "unavailable"
        }
    };

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "codementor",
        "database": database,
        "model": state.model.model(),
    }))
}
