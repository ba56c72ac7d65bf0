// ABOUTME: Login session management module
// ABOUTME: Bearer token generation, storage, and resolution

pub mod storage;
pub mod types;

pub use storage::SessionStorage;
pub use types::{Session, SessionGeneration};
