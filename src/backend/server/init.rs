/**
 * Server Initialization
 *
 * 1. Load the optional database
 * 2. Pick the stores (PostgreSQL, or in memory without a database, with
 *    users seeded from `CHAT_SEED_USERS`)
 * 3. Build the chat service and the realtime hub
 * 4. Create the router
 */

use crate::backend::auth::{InMemoryUserDirectory, JwtKeys, PgUserDirectory, UserDirectory};
use crate::backend::chat::{ChatService, ChatSessionStore, InMemoryChatStore, PgChatStore};
use crate::backend::realtime::RealtimeHub;
use crate::backend::routes::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;
use axum::Router;
use std::sync::Arc;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("[Server] Initializing chat backend");

    let db_pool = load_database(&config).await;

    let (store, users): (Arc<dyn ChatSessionStore>, Arc<dyn UserDirectory>) = match &db_pool {
        Some(pool) => (
            Arc::new(PgChatStore::new(pool.clone())),
            Arc::new(PgUserDirectory::new(pool.clone())),
        ),
        None => (
            Arc::new(InMemoryChatStore::new()),
            Arc::new(seeded_directory(&config)),
        ),
    };

    let state = build_state(config, store, users, db_pool);
    create_router(state)
}

/// In-memory user directory holding `config.seed_users`
pub fn seeded_directory(config: &AppConfig) -> InMemoryUserDirectory {
    let directory = config
        .seed_users
        .iter()
        .fold(InMemoryUserDirectory::new(), |directory, (user_id, full_name)| {
            directory.with_user(*user_id, full_name)
        });
    if directory.is_empty() {
        tracing::warn!("[Server] CHAT_SEED_USERS is empty. No user can open a chat session.");
    } else {
        tracing::info!("[Server] In-memory directory seeded with {} user(s)", directory.len());
    }
    directory
}

/// Assemble the application state around the given stores
pub fn build_state(
    config: AppConfig,
    store: Arc<dyn ChatSessionStore>,
    users: Arc<dyn UserDirectory>,
    db_pool: Option<sqlx::PgPool>,
) -> AppState {
    let chat = ChatService::new(store, users);
    let keys = JwtKeys::new(&config.jwt_secret, config.token_ttl_secs);
    let realtime = RealtimeHub::new(chat, keys, config.realtime_buffer);

    tracing::info!(
        "[Server] Realtime hub ready (outbound buffer {})",
        config.realtime_buffer
    );

    AppState::new(config, realtime, db_pool)
}
