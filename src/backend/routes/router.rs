/**
 * Router Configuration
 *
 * Combines the chat routes with the health endpoint and request tracing.
 */

use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub online_users: usize,
    pub connections: usize,
}

/// Liveness probe with presence counters (GET /health)
pub async fn health(State(app_state): State<AppState>) -> Json<HealthStatus> {
    let registry = app_state.realtime.registry();
    Json(HealthStatus {
        status: "ok",
        online_users: registry.online_user_count(),
        connections: registry.connection_count(),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/health", get(health));
    let router = configure_chat_routes(router, &app_state);

    router
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "404 Not Found") })
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
