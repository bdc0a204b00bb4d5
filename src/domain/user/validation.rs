//! User validation utilities

use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username is required")]
    EmptyUsername,

    #[error("Username exceeds maximum length of {0} characters")]
    UsernameTooLong(usize),

    #[error("Username cannot contain control characters")]
    InvalidUsernameCharacter,

    #[error("Email is required")]
    EmptyEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Password exceeds maximum length of {0} characters")]
    PasswordTooLong(usize),
}

const MAX_USERNAME_LENGTH: usize = 50;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validate a username
///
/// Rules:
/// - Cannot be empty or whitespace only
/// - Maximum 50 characters
/// - No control characters
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    let trimmed = username.trim();

    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(UserValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(UserValidationError::InvalidUsernameCharacter);
    }

    Ok(())
}

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Maximum 254 characters
/// - Must be `local@domain` with a dotted domain
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let trimmed = email.trim();

    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    if trimmed.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    let has_dotted_domain = trimmed
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));

    if !trimmed.validate_email() || !has_dotted_domain {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password
///
/// Rules:
/// - Cannot be empty
/// - Maximum 128 characters
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
    }

    Ok(())
}

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
