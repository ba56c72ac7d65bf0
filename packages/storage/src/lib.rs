// ABOUTME: Data layer and persistence for Codementor
// ABOUTME: SQLite pool setup, schema migrations, history and roadmap storage

pub mod db;
pub mod history;
pub mod roadmap;

use thiserror::Error;

pub use db::{init_memory_pool, init_pool, MIGRATOR};
pub use history::HistoryStorage;
pub use roadmap::RoadmapStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Duplicate email: {0}")]
    DuplicateEmail(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
