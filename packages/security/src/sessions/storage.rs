// ABOUTME: Storage operations for login sessions
// ABOUTME: Token generation, hashing, expiry-aware resolution, and revocation

use base64::Engine;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use codementor_core::SESSION_TTL_DAYS;
use codementor_storage::StorageError;

use super::types::{Session, SessionGeneration};

pub struct SessionStorage {
    pool: SqlitePool,
    ttl: Duration,
}

impl SessionStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_ttl(pool, Duration::days(SESSION_TTL_DAYS))
    }

    pub fn with_ttl(pool: SqlitePool, ttl: Duration) -> Self {
        Self { pool, ttl }
    }

    /// Generate a cryptographically secure random token
    /// Returns a base64-encoded 32-byte token
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
    }

    /// Hash a token using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a token against a stored hash using constant-time comparison
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        use subtle::ConstantTimeEq;

        Self::hash_token(token)
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Open a new session for `user_id`
    pub async fn create_session(&self, user_id: &str) -> Result<SessionGeneration, StorageError> {
        let token = Self::generate_token();
        let now = Utc::now();
        let expires_at = now + self.ttl;

        sqlx::query(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(Self::hash_token(&token))
        .bind(user_id)
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        debug!("Opened session for user {}", user_id);

        Ok(SessionGeneration { token, expires_at })
    }

    /// Resolve a bearer token to its session, ignoring expired ones
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(
            "SELECT token_hash, user_id, created_at, expires_at FROM sessions WHERE token_hash = ?",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let session = Session {
            token_hash: row.try_get("token_hash")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            expires_at: row.try_get("expires_at")?,
        };

        // Double-check with constant-time comparison
        if !Self::verify_token_hash(token, &session.token_hash) || session.is_expired(Utc::now()) {
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Revoke a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(Self::hash_token(token))
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Delete expired sessions, returning how many were removed
    pub async fn purge_expired(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }
}
