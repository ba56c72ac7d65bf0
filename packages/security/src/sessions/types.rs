// ABOUTME: Type definitions for login sessions
// ABOUTME: Structures for issued bearer tokens and their stored records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session stored in database; only the token hash is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token_hash: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Result of a login. This is the ONLY time the plaintext token is available.
#[derive(Debug, Clone)]
pub struct SessionGeneration {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
