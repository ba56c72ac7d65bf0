// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Listener address, database location, CORS origin, static bundle, and Gemini settings

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use codementor_ai::GeminiConfig;
use codementor_core::DEFAULT_DATABASE_URL;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Static directory does not exist: {0}")]
    MissingStaticDir(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub database_url: String,
    pub cors_origin: String,
    pub static_dir: Option<PathBuf>,
    pub gemini: GeminiConfig,
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match non_empty_var("PORT") {
            Some(port) => port.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let static_dir = non_empty_var("STATIC_DIR").map(PathBuf::from);
        if let Some(dir) = &static_dir {
            if !dir.is_dir() {
                return Err(ConfigError::MissingStaticDir(dir.display().to_string()));
            }
        }

        Ok(Config {
            port,
            host: non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            database_url: non_empty_var("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            cors_origin: non_empty_var("CORS_ORIGIN").unwrap_or_else(|| "*".to_string()),
            static_dir,
            gemini: GeminiConfig::from_env(),
        })
    }
}
