//! Layered configuration shared by every service
//!
//! Defaults first, then environment variables using `__` as the section
//! separator (`SERVER__PORT`, `JWT__SECRET`, `STORAGE__ROOT`). The plain
//! `DATABASE_URL` variable wins over `DATABASE__URL` when both are set.

use config::{Config, ConfigBuilder, ConfigError, Environment, builder::DefaultState};
use serde::Deserialize;

use crate::database::DEFAULT_DATABASE_URL;

pub const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

pub const DEV_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Browser origins allowed to call the API
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma separated list of origins
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

fn default_allowed_origins() -> String {
    DEV_ALLOWED_ORIGINS.to_string()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl CorsConfig {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Builder preloaded with the sections common to all services
///
/// Services add their own defaults (`server.port`, ...) before calling
/// `build()` and `try_deserialize()`.
pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .add_source(Environment::default().separator("__"))
        .set_default("server.host", "0.0.0.0")?
        .set_default("database.url", DEFAULT_DATABASE_URL)?
        .set_default("database.max_connections", 10)?
        .set_default("database.min_connections", 1)?
        .set_default("database.connection_timeout", 30)?
        .set_default("jwt.secret", DEV_JWT_SECRET)?
        .set_default("jwt.expiry_hours", 24)?
        .set_default("storage.root", "uploads")?
        .set_default("storage.public_prefix", "/uploads")?
        .set_default("cors.allowed_origins", DEV_ALLOWED_ORIGINS)?
        .set_override_option("database.url", std::env::var("DATABASE_URL").ok())
}
