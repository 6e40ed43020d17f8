//! Migrate command - applies the PostgreSQL schema

use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{self, PostgresConfig, PostgresMigrator};

/// Apply every pending migration against `storage.database_url`
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let url = config
        .storage
        .database_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| anyhow::anyhow!("set DATABASE_URL or APP__STORAGE__DATABASE_URL"))?;

    let pool = storage::connect(&PostgresConfig::new(url).with_max_connections(1)).await?;

    let applied = storage::run_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    info!(applied, ?version, "Migrations complete");

    pool.close().await;

    Ok(())
}
