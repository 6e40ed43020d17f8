use serde::Deserialize;
use thiserror::Error;

use crate::domain::auth::{DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
use crate::infrastructure::user::PasswordConfig;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("JWT signing secret is not configured (set JWT_SECRET or APP__AUTH__JWT_SECRET)")]
    MissingSigningSecret,

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC signing secret; required at startup
    pub jwt_secret: Option<String>,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
    pub hashing: PasswordConfig,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[hidden]"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("hashing", &self.hashing)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Apply pending migrations when the server starts
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to make credentialed requests. Empty allows any origin
    /// without credentials.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            hashing: PasswordConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
            run_migrations: true,
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, `APP__*` variables and
    /// finally the legacy `JWT_SECRET`, `REST_PORT` and `DATABASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_legacy_env(|key| std::env::var(key).ok())?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Apply the variables the previous deployment used
    pub fn apply_legacy_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(port) = lookup("REST_PORT") {
            self.server.port = parse_rest_port(&port)?;
        }

        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database_url = Some(url);
        }

        Ok(())
    }

    /// Reject combinations that cannot start
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "auth.token_ttl_secs",
                message: "must be greater than zero".to_string(),
            });
        }

        if self.auth.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::InvalidValue {
                key: "auth.token_ttl_secs",
                message: format!("must not exceed {} seconds", MAX_TOKEN_TTL_SECS),
            });
        }

        if self.storage.backend == StorageBackend::Postgres
            && self.storage.database_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::InvalidValue {
                key: "storage.database_url",
                message: "required for the postgres backend".to_string(),
            });
        }

        Ok(())
    }

    /// The signing secret; absent or blank is fatal
    pub fn signing_secret(&self) -> Result<&str, ConfigError> {
        match self.auth.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => Err(ConfigError::MissingSigningSecret),
        }
    }
}

/// Accepts both `10000` and the listen-address form `:10000`
fn parse_rest_port(value: &str) -> Result<u16, ConfigError> {
    let trimmed = value.trim();
    let port = trimmed.rsplit(':').next().unwrap_or(trimmed);

    port.parse().map_err(|_| ConfigError::InvalidValue {
        key: "REST_PORT",
        message: format!("'{}' is not a port", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 10000);
        assert_eq!(config.auth.token_ttl_secs, 86_400);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.cors.allowed_origins.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_secret() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.signing_secret(),
            Err(ConfigError::MissingSigningSecret)
        ));

        config.auth.jwt_secret = Some("   ".to_string());
        assert!(matches!(
            config.signing_secret(),
            Err(ConfigError::MissingSigningSecret)
        ));

        config.auth.jwt_secret = Some("s3cret".to_string());
        assert_eq!(config.signing_secret().unwrap(), "s3cret");
    }

    #[test]
    fn test_legacy_env() {
        let mut config = AppConfig::default();

        config
            .apply_legacy_env(env(&[
                ("JWT_SECRET", "legacy"),
                ("REST_PORT", ":9000"),
                ("DATABASE_URL", "postgres://db/auth"),
            ]))
            .unwrap();

        assert_eq!(config.signing_secret().unwrap(), "legacy");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.database_url.as_deref(), Some("postgres://db/auth"));
    }

    #[test]
    fn test_legacy_port_forms() {
        assert_eq!(parse_rest_port("10000").unwrap(), 10000);
        assert_eq!(parse_rest_port(":10000").unwrap(), 10000);
        assert_eq!(parse_rest_port("0.0.0.0:8081").unwrap(), 8081);
        assert!(parse_rest_port("http").is_err());
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Postgres;
        assert!(config.validate().is_err());

        config.storage.database_url = Some("postgres://db/auth".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.auth.token_ttl_secs = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { key: "auth.token_ttl_secs", .. })
        ));
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let mut config = AppConfig::default();

        config.auth.token_ttl_secs = MAX_TOKEN_TTL_SECS;
        assert!(config.validate().is_ok());

        for ttl in [MAX_TOKEN_TTL_SECS + 1, i64::MAX as u64 + 1, u64::MAX] {
            config.auth.token_ttl_secs = ttl;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue { key: "auth.token_ttl_secs", .. })
            ));
        }
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: AppConfig = config::Config::builder()
            .set_override("auth.jwt_secret", "from-file")
            .unwrap()
            .set_override("storage.backend", "postgres")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.signing_secret().unwrap(), "from-file");
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 10000);
        assert_eq!(config.auth.token_ttl_secs, 86_400);
    }

    #[test]
    fn test_debug_hides_secret() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("super-secret".to_string());

        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
