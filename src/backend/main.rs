/**
 * Lost & Found Chat Server Entry Point
 *
 * Loads configuration from the environment, initializes tracing and serves
 * the HTTP API and the chat hub.
 */

use lostfound_chat::backend::server::create_app;
use lostfound_chat::shared::config::DEV_JWT_SECRET;
use lostfound_chat::shared::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    // config reads RUST_LOG, so the subscriber can only start afterwards
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!("[Server] Starting with log filter {}", config.log_filter);
    if config.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("[Server] Tokens are signed with the development secret");
    }

    let addr = config.bind_addr;
    let app = create_app(config).await;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Server] Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
