//! API service configuration

use common::{
    database::DatabaseConfig,
    settings::{self, CorsConfig, ServerConfig},
    storage::StorageConfig,
    token::TokenConfig,
};
use config::ConfigError;
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: TokenConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl ApiConfig {
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
    fn defaults() {
        unsafe {
            std::env::remove_var("SERVER__PORT");
            std::env::remove_var("STORAGE__PUBLIC_PREFIX");
        }

        let config = ApiConfig::load().unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.storage.public_prefix, "/uploads");
        assert_eq!(config.cors.origins().len(), 2);
    }
}
