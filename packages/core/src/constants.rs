/// Minimum accepted password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Lifetime of a login session token
pub const SESSION_TTL_DAYS: i64 = 7;

/// Upper bound for a generated learning roadmap
pub const MAX_ROADMAP_DAYS: u32 = 90;

/// Database used when DATABASE_URL is not set
pub const DEFAULT_DATABASE_URL: &str = "sqlite://codementor.db?mode=rwc";
