//! Auth Service
//!
//! Credential issuance and verification:
//! - Account registration with Argon2id password hashing
//! - Login returning HS256-signed bearer tokens
//! - Stateless token validation for other services
//! - Caller lookup from a bearer token

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use crate::config::StorageBackend;
use domain::user::UserRepository;
use infrastructure::{
    auth::{AuthService, JwtConfig, JwtService},
    storage::{self, PostgresConfig},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository},
};
use tracing::info;

/// Create the application state with custom configuration
///
/// Fails when the signing secret is absent, the hashing cost is invalid or
/// the configured database cannot be reached.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    // Checked first so a missing secret aborts before touching the database.
    config.signing_secret()?;

    let users = create_user_repository(config).await?;

    create_app_state_with_repository(config, users)
}

/// Build the state around an existing user directory
pub fn create_app_state_with_repository(
    config: &AppConfig,
    users: Arc<dyn UserRepository>,
) -> anyhow::Result<AppState> {
    let secret = config.signing_secret()?;

    let hasher = Argon2Hasher::new(config.auth.hashing)?;
    let tokens = JwtService::new(JwtConfig::new(secret, config.auth.token_ttl_secs));

    let auth_service = AuthService::new(users, Arc::new(hasher), Arc::new(tokens));

    Ok(AppState::new(Arc::new(auth_service)))
}

async fn create_user_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn UserRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory user directory");
            Ok(Arc::new(InMemoryUserRepository::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;

            let pool = storage::connect(
                &PostgresConfig::new(url).with_max_connections(config.storage.max_connections),
            )
            .await?;

            if config.storage.run_migrations {
                let applied = storage::run_migrations(&pool).await?;
                info!(applied, "Database migrations complete");
            }

            info!("Using PostgreSQL user directory");
            Ok(Arc::new(PostgresUserRepository::new(pool)))
        }
    }
}
