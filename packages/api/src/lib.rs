// ABOUTME: HTTP API layer for Codementor providing REST endpoints and routing
// ABOUTME: Integration layer that depends on all domain packages

use axum::{
    routing::{delete, get, post},
    Router,
};

pub mod ai_handlers;
pub mod auth;
pub mod auth_handlers;
pub mod error;
pub mod health;
pub mod history_handlers;
pub mod response;
pub mod roadmap_handlers;
pub mod state;

pub use auth::CurrentUser;
pub use error::{ApiResult, AppError};
pub use response::ApiResponse;
pub use state::AppState;

/// Creates the account router (nested under /api/auth)
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .route("/profile", get(auth_handlers::profile))
}

/// Creates the history router (nested under /api/history)
pub fn create_history_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(history_handlers::list_history).post(history_handlers::add_history),
        )
        .route("/add", post(history_handlers::add_history))
        .route("/{index}", delete(history_handlers::delete_history))
}

/// Creates the language model router (nested under /ai)
pub fn create_ai_router() -> Router<AppState> {
    Router::new()
        .route("/get-review", post(ai_handlers::get_review))
        .route("/generate-code", post(ai_handlers::generate_code))
        .route("/generate-roadmap", post(roadmap_handlers::generate_roadmap))
        .route("/mark-day-complete", post(roadmap_handlers::mark_day_complete))
        .route(
            "/get-roadmap-progress",
            get(roadmap_handlers::get_roadmap_progress),
        )
}

/// Assemble every route into one router with state applied
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/api/health", get(health::health_check))
        .nest("/api/auth", create_auth_router())
        .nest("/api/history", create_history_router())
        .nest("/ai", create_ai_router())
        .with_state(state)
}
