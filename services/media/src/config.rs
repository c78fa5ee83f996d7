//! Media service configuration

use common::{database::DatabaseConfig, settings, storage::StorageConfig};
use config::ConfigError;
use serde::Deserialize;

/// Six-field cron expression (with seconds): every minute
pub const DEFAULT_SWEEP_SCHEDULE: &str = "0 * * * * *";

#[derive(Debug, Clone, Deserialize)]
pub struct SweeperConfig {
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn default_schedule() -> String {
    DEFAULT_SWEEP_SCHEDULE.to_string()
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub sweeper: SweeperConfig,
}

impl MediaConfig {
    pub fn load() -> Result<Self, ConfigError> {
        settings::builder()?
            .set_default("sweeper.schedule", DEFAULT_SWEEP_SCHEDULE)?
            .build()?
            .try_deserialize()
    }
}
