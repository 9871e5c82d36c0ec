/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. The
 * `FromRef` impls let handlers extract only the part they use, e.g.
 * `State<ChatService>` or `State<RealtimeHub>`.
 *
 * Everything inside is cheap to clone: services hold `Arc`s, and the
 * database pool is itself reference counted.
 */

use crate::backend::auth::JwtKeys;
use crate::backend::chat::service::ChatService;
use crate::backend::realtime::RealtimeHub;
use crate::shared::AppConfig;
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Configuration the server was started with
    pub config: Arc<AppConfig>,

    /// Chat service, registry, hub and dispatcher
    pub realtime: RealtimeHub,

    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not configured; the chat service then
    /// runs on the in-memory store.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(config: AppConfig, realtime: RealtimeHub, db_pool: Option<PgPool>) -> Self {
        Self {
            config: Arc::new(config),
            realtime,
            db_pool,
        }
    }
}

impl FromRef<AppState> for RealtimeHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.clone()
    }
}

impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.chat().clone()
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime.keys().clone()
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}
