//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, LogFormat, LoggingConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
