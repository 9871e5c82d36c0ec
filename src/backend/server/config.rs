/**
 * Server Configuration
 *
 * Loads the optional PostgreSQL connection. Failures are logged and the
 * server keeps running on the in-memory store.
 */

use crate::shared::AppConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database configuration result
///
/// Contains the database connection pool if successfully configured,
/// or `None` if the database is not available.
pub type DatabaseConfig = Option<PgPool>;

/// Connect to `config.database_url` and run the migrations
pub async fn load_database(config: &AppConfig) -> DatabaseConfig {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("[Server] DATABASE_URL not set. Chat data is kept in memory only.");
        return None;
    };

    tracing::info!("[Server] Connecting to database...");

    let pool = match PgPoolOptions::new().max_connections(10).connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("[Server] Failed to create database connection pool: {:?}", e);
            tracing::warn!("[Server] Falling back to the in-memory chat store.");
            return None;
        }
    };

    tracing::info!("[Server] Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("[Server] Database migrations completed successfully"),
        Err(e) => {
            // the schema may already be in place
            tracing::error!("[Server] Failed to run database migrations: {}", e);
        }
    }

    Some(pool)
}
