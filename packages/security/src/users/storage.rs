// ABOUTME: User storage layer using SQLite
// ABOUTME: Account creation with hashed passwords, lookup, and credential checks

use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::debug;

use codementor_core::generate_id;
use codementor_storage::StorageError;

use super::types::{normalize_email, NewUser, User};
use crate::password::{hash_password, verify_password};
use crate::SecurityError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account. The password is hashed before it reaches the database.
    ///
    /// Fails with `StorageError::DuplicateEmail` when the email is taken.
    pub async fn create_user(&self, input: NewUser) -> Result<User, SecurityError> {
        let email = normalize_email(&input.email);

        if self.find_by_email(&email).await?.is_some() {
            return Err(StorageError::DuplicateEmail(email).into());
        }

        let id = generate_id();
        let password_hash = hash_password(&input.password)?;

        debug!("Creating user {}", id);

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(input.username.trim())
        .bind(&email)
        .bind(&password_hash)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StorageError::DuplicateEmail(email.clone())
            }
            other => StorageError::Sqlx(other),
        })?;

        Ok(self.get_user(&id).await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        row_to_user(&row)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Return the user when `password` matches; `None` covers both an unknown
    /// email and a wrong password so callers cannot tell them apart.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, SecurityError> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, StorageError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}
