//! User entity and related types

use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::validation::{USER_ID_BYTES, UserValidationError, normalize_email, validate_user_id};

/// User identifier - 128 random bits, lowercase hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a UserId from an existing value after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    ///
    /// Collisions are not re-checked against the store; with 128 bits of
    /// entropy they are treated as impossible.
    pub fn generate() -> Self {
        let mut bytes = [0u8; USER_ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persistent identity record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier, used as the token subject
    id: UserId,
    /// Display name, not unique
    username: String,
    /// Lowercased email, unique across the directory
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing, default)]
    password_hash: String,
    /// Creation time (epoch seconds)
    created_at: i64,
    /// Last update time (epoch seconds)
    updated_at: i64,
}

impl User {
    /// Create a new user
    ///
    /// The email is normalized here so that no caller can store a mixed-case
    /// address by accident.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
        now: i64,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from stored columns
    pub fn restore(
        id: UserId,
        username: String,
        email: String,
        password_hash: String,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Public projection returned to callers
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user_id: self.id.as_str().to_string(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of a user, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    pub email: String,
}
