use anyhow::Result;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use auth::{
    AppState,
    config::AuthConfig,
    rate_limiter::RateLimiter,
    routes::{cors_layer, create_router},
};
use common::{
    database::{health_check, init_pool, run_migrations},
    storage::MediaStore,
    token::TokenService,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("auth=info,common=info,tower_http=info")),
        )
        .init();

    info!("Starting authentication service");

    let config = AuthConfig::load()?;

    let pool = init_pool(&config.database).await?;
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }
    run_migrations(&pool).await?;

    let store = MediaStore::new(&config.storage);
    let state = AppState::new(
        pool,
        TokenService::new(&config.jwt),
        RateLimiter::new(config.rate_limit.clone()),
        store.default_profile_picture(),
    );

    let app = create_router(state)
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http());

    let address = config.server.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Authentication service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
