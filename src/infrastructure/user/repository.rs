//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Directory {
    users: HashMap<String, User>,
    /// Index for email -> user ID lookup
    email_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
///
/// Both maps sit behind one lock so the email uniqueness check and the insert
/// are a single atomic step.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    inner: Arc<RwLock<Directory>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut directory = Directory::default();

        for user in users {
            let id = user.id().as_str().to_string();
            directory
                .email_index
                .insert(user.email().to_string(), id.clone());
            directory.users.insert(id, user);
        }

        Self {
            inner: Arc::new(RwLock::new(directory)),
        }
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn count_by_email(&self, email: &str) -> Result<u64, DomainError> {
        let directory = self.inner.read().await;
        Ok(u64::from(directory.email_index.contains_key(email)))
    }

    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut directory = self.inner.write().await;

        let id = user.id().as_str().to_string();
        let email = user.email().to_string();

        if directory.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already registered",
                email
            )));
        }

        if directory.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        directory.email_index.insert(email, id.clone());
        directory.users.insert(id, user.clone());

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let directory = self.inner.read().await;

        Ok(directory
            .email_index
            .get(email)
            .and_then(|id| directory.users.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let directory = self.inner.read().await;
        Ok(directory.users.get(id.as_str()).cloned())
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str, email: &str) -> User {
        User::new(UserId::generate(), username, email, "hash", 1_700_000_000)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("alice", "alice@example.com");

        repo.insert(&user).await.unwrap();

        let by_id = repo.find_by_id(user.id()).await.unwrap().unwrap();
        assert_eq!(by_id.username(), "alice");

        let by_email = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id(), user.id());
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemoryUserRepository::new();

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(repo.find_by_id(&UserId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_count_by_email() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.count_by_email("alice@example.com").await.unwrap(), 0);

        repo.insert(&create_test_user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(repo.count_by_email("alice@example.com").await.unwrap(), 1);
        assert_eq!(repo.count_by_email("bob@example.com").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflict() {
        let repo = InMemoryUserRepository::new();

        repo.insert(&create_test_user("alice", "alice@example.com"))
            .await
            .unwrap();
        let result = repo
            .insert(&create_test_user("other", "ALICE@example.com"))
            .await;

        assert!(result.unwrap_err().is_conflict());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_same_email() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(&create_test_user(&format!("user{}", i), "race@example.com"))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_with_users() {
        let alice = create_test_user("alice", "alice@example.com");
        let repo = InMemoryUserRepository::with_users(vec![alice.clone()]);

        let found = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(found.id(), alice.id());
    }
}
