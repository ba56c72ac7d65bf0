// ABOUTME: Accounts, credentials, and login sessions for Codementor
// ABOUTME: Provides password hashing, user storage, and bearer session storage

pub mod password;
pub mod sessions;
pub mod users;

use codementor_storage::StorageError;

// Re-export main types for convenience
pub use password::{hash_password, verify_password, PasswordError};
pub use sessions::{Session, SessionGeneration, SessionStorage};
pub use users::{normalize_email, NewUser, User, UserStorage};

#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}
