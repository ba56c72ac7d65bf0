// ABOUTME: Library half of the codementor binary
// ABOUTME: Configuration, middleware, and server startup shared with tests

pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, run_server};
