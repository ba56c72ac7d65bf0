// ABOUTME: HTTP server assembly and startup
// ABOUTME: Wires storage, the Gemini model and middleware around the API router

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use codementor_ai::GeminiService;
use codementor_api::{create_router, AppState};
use codementor_storage::init_pool;

use crate::config::Config;
use crate::middleware::{cors_layer, create_panic_handler, InvalidOrigin};

/// Apply middleware and the optional static bundle to the API router
pub fn build_app(state: AppState, config: &Config) -> Result<Router, InvalidOrigin> {
    let mut app = create_router(state);

    // Unknown paths fall through to the frontend bundle, which routes client-side
    if let Some(dir) = &config.static_dir {
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    Ok(app
        .layer(create_panic_handler())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin)?))
}

pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let pool = init_pool(&config.database_url)
        .await
        .context("Failed to open database")?;

    let model = GeminiService::new(config.gemini.clone()).context("Failed to create Gemini client")?;
    let state = AppState::new(pool, Arc::new(model));

    let purged = state.sessions.purge_expired().await?;
    if purged > 0 {
        info!("Removed {} expired sessions", purged);
    }

    let app = build_app(state, &config)?;

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!("Server listening on http://{}", listener.local_addr()?);
    info!("CORS origin: {}", config.cors_origin);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
