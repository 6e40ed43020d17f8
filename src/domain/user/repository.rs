//! User directory trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for the user directory
///
/// Emails passed in are already normalized. Implementations must enforce
/// email uniqueness atomically on insert and report a violation as
/// `DomainError::Conflict`; connectivity failures are `DomainError::Storage`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Count users registered under an email
    async fn count_by_email(&self, email: &str) -> Result<u64, DomainError>;

    /// Insert a new user
    async fn insert(&self, user: &User) -> Result<(), DomainError>;

    /// Get a user by their email (for login)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by their ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), DomainError>;
}
