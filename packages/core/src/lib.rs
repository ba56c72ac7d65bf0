// ABOUTME: Core types, validation rules, and utilities for Codementor
// ABOUTME: Foundational package shared by storage, security, ai and api packages

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    HistoryEntry, HistoryInput, HistoryKind, HistoryPayload, Roadmap, RoadmapDay, RoadmapError,
    RoadmapProgress, RoadmapRequest, UserProfile,
};

// Re-export constants
pub use constants::{
    DEFAULT_DATABASE_URL, MAX_ROADMAP_DAYS, MIN_PASSWORD_LENGTH, SESSION_TTL_DAYS,
};

// Re-export utilities
pub use utils::{generate_id, truncate};

// Re-export validation
pub use validation::{
    validate_email, validate_password, validate_roadmap_request, validate_username,
    ValidationError,
};
