use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use nysc_portal::{config::Config, create_router, db, AppState, RouterOptions};

/// How often expired refresh tokens are purged
const TOKEN_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

fn spawn_token_purge(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            match state.auth_service.purge_expired_tokens().await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Purged {} expired refresh tokens", removed),
                Err(e) => tracing::error!("Failed to purge expired refresh tokens: {}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("NYSC Portal API - Starting...");

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    let state = AppState::new(db_pool, &config)?;

    spawn_token_purge(state.clone());

    let app = create_router(state, &RouterOptions::from_config(&config));

    let addr = config.server.bind_address();
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("NYSC Portal API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
