//! PostgreSQL user repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of UserRepository
///
/// Email uniqueness is enforced by the `users_email_key` unique index, so two
/// racing registrations resolve in the database.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn count_by_email(&self, email: &str) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count.max(0) as u64)
    }

    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.username())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict(format!("Email '{}' already registered", user.email()))
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Database ping failed: {}", e)))?;
        Ok(())
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read id: {}", e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| DomainError::storage(format!("Failed to read username: {}", e)))?;
    let email: String = row
        .try_get("email")
        .map_err(|e| DomainError::storage(format!("Failed to read email: {}", e)))?;
    let password_hash: String = row
        .try_get("password_hash")
        .map_err(|e| DomainError::storage(format!("Failed to read password_hash: {}", e)))?;
    let created_at: i64 = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Failed to read created_at: {}", e)))?;
    let updated_at: i64 = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Failed to read updated_at: {}", e)))?;

    let user_id = UserId::new(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::restore(
        user_id,
        username,
        email,
        password_hash,
        created_at,
        updated_at,
    ))
}
