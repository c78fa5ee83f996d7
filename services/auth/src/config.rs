//! Authentication service configuration

use common::{
    database::DatabaseConfig,
    settings::{self, CorsConfig, ServerConfig},
    storage::StorageConfig,
    token::TokenConfig,
};
use config::ConfigError;
use serde::Deserialize;

use crate::rate_limiter::RateLimiterConfig;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: TokenConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub rate_limit: RateLimiterConfig,
}

impl AuthConfig {
    /// Load defaults overridden by the environment
    pub fn load() -> Result<Self, ConfigError> {
        settings::builder()?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn loads_with_service_defaults() {
        unsafe {
            std::env::remove_var("SERVER__PORT");
            std::env::remove_var("RATE_LIMIT__MAX_ATTEMPTS");
        }

        let config = AuthConfig::load().unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.jwt.expiry_hours, 24);
        assert_eq!(config.rate_limit.max_attempts, 5);
    }

    #[test]
    #[serial]
    fn port_comes_from_environment() {
        unsafe {
            std::env::set_var("SERVER__PORT", "4100");
        }

        let config = AuthConfig::load().unwrap();
        assert_eq!(config.server.port, 4100);

        unsafe {
            std::env::remove_var("SERVER__PORT");
        }
    }
}
