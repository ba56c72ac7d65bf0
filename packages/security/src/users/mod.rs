// ABOUTME: User management module
// ABOUTME: Provides types and storage for accounts and their credentials

pub mod storage;
pub mod types;


pub use storage::UserStorage;
pub use types::*;
