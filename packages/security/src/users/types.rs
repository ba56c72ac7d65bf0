// ABOUTME: User type definitions
// ABOUTME: Account record with credentials and its public profile projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use codementor_core::{HistoryEntry, Roadmap, UserProfile};

/// Stored account. `password_hash` never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Build the public profile, attaching the user's history and roadmap
    pub fn into_profile(self, history: Vec<HistoryEntry>, roadmap: Option<Roadmap>) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
            history,
            roadmap,
        }
    }
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
