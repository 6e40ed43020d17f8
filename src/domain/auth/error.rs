//! Authentication failure taxonomy

use thiserror::Error;

/// Outcome of a failed auth operation
///
/// Token decode failures are collapsed into `InvalidToken` here; the finer
/// `TokenError` reason is only ever logged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("user not found")]
    UserNotFound,
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the failure is the service's fault rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Hashing(_) | Self::Store(_) | Self::TokenIssuance(_)
        )
    }
}
