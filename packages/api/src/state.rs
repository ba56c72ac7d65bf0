// ABOUTME: Shared application state handed to every handler
// ABOUTME: Bundles the connection pool, storage services, and the language model

use std::sync::Arc;

use sqlx::SqlitePool;

use codementor_ai::LanguageModel;
use codementor_security::{SessionStorage, UserStorage};
use codementor_storage::{HistoryStorage, RoadmapStorage};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: Arc<UserStorage>,
    pub sessions: Arc<SessionStorage>,
    pub history: Arc<HistoryStorage>,
    pub roadmaps: Arc<RoadmapStorage>,
    pub model: Arc<dyn LanguageModel>,
}

impl AppState {
    /// Create application state from a migrated pool and a model backend
    pub fn new(pool: SqlitePool, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            users: Arc::new(UserStorage::new(pool.clone())),
            sessions: Arc::new(SessionStorage::new(pool.clone())),
            history: Arc::new(HistoryStorage::new(pool.clone())),
            roadmaps: Arc::new(RoadmapStorage::new(pool.clone())),
            model,
            pool,
        }
    }
}
