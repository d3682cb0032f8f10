// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request body validation.
//!
//! Runs before any credential or token work so that malformed requests are
//! reported as input errors, never as authentication failures.

use miniblog_common::{LoginInput, RegisterInput};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Common validation constants
const MAX_USERNAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    if username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username is required".to_string(),
        ));
    }

    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username cannot exceed {MAX_USERNAME_LENGTH} characters"
        )));
    }

    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address is required".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a new password against the configured minimum length
pub fn validate_password(password: &str, min_length: usize) -> ValidationResult<&str> {
    if password.chars().count() < min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {min_length} characters"
        )));
    }

    Ok(password)
}

/// Validate a registration request
pub fn validate_register(input: &RegisterInput, min_password_length: usize) -> ValidationResult<()> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password(&input.password, min_password_length)?;
    Ok(())
}

/// Validate a login request.
///
/// Only presence and shape are checked here; the password length policy
/// applies to new passwords, not to login attempts.
pub fn validate_login(input: &LoginInput) -> ValidationResult<()> {
    validate_email(&input.email)?;
    if input.password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password is required".to_string(),
        ));
    }
    Ok(())
}
