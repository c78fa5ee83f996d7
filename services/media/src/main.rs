use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{
    database::{health_check, init_pool},
    storage::MediaStore,
};
use media::{config::MediaConfig, database::StoryRepository, sweeper::StorySweeper};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("media=info,common=info")),
        )
        .init();

    info!("Starting media service");

    let config = MediaConfig::load()?;

    let pool = init_pool(&config.database).await?;
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let sweeper = StorySweeper::new(StoryRepository::new(pool), MediaStore::new(&config.storage));

    // Catch up on anything that expired while the service was down
    if let Err(e) = sweeper.sweep_once(Utc::now()).await {
        error!("Initial story sweep failed: {}", e);
    }

    let mut scheduler = sweeper.start(&config.sweeper.schedule).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down media service");
    scheduler.shutdown().await?;

    Ok(())
}
