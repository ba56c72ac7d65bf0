// ABOUTME: Input validation for registration and roadmap requests
// ABOUTME: Returns typed errors whose messages are safe to show to API clients

use regex::Regex;
use thiserror::Error;

use crate::constants::{MAX_ROADMAP_DAYS, MIN_PASSWORD_LENGTH};
use crate::types::RoadmapRequest;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },

    #[error("A valid email address is required.")]
    InvalidEmail,

    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Duration must be between 1 and {max} days.")]
    DurationOutOfRange { max: u32 },
}

lazy_static::lazy_static! {
    // One `@` with a non-empty local part and domain, no whitespace
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+$").expect("email pattern is a valid regex");
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::MissingField("Username"));
    }
    Ok(())
}

/// Validate a roadmap generation request before any model call is made
pub fn validate_roadmap_request(request: &RoadmapRequest) -> Result<(), ValidationError> {
    if request.field.trim().is_empty() {
        return Err(ValidationError::MissingField("Field"));
    }
    if request.skill_level.trim().is_empty() {
        return Err(ValidationError::MissingField("Skill level"));
    }
    if request.duration == 0 || request.duration > MAX_ROADMAP_DAYS {
        return Err(ValidationError::DurationOutOfRange {
            max: MAX_ROADMAP_DAYS,
        });
    }
    Ok(())
}
