//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID must be exactly {0} characters")]
    InvalidIdLength(usize),

    #[error("User ID contains invalid character: '{0}'. Only lowercase hex digits are allowed")]
    InvalidIdCharacter(char),

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Number of random bytes behind a generated user ID
pub const USER_ID_BYTES: usize = 16;

const USER_ID_LENGTH: usize = USER_ID_BYTES * 2;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Exactly 32 characters
/// - Only lowercase hexadecimal digits
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() != USER_ID_LENGTH {
        return Err(UserValidationError::InvalidIdLength(USER_ID_LENGTH));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        return Err(UserValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Reject an empty value for a required field
pub fn require_field(name: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.is_empty() {
        return Err(UserValidationError::MissingField(name));
    }

    Ok(())
}

/// Normalize an email address for storage and comparison
///
/// Emails are compared case-insensitively, so every lookup and insert goes
/// through the lowercase form.
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}
