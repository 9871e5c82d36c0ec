/**
 * Chat Routes
 *
 * ## HTTP (bearer token required)
 * - `GET /api/chat/sessions` - session summaries
 * - `POST /api/chat/sessions/{id}` - open or create the session with user `id`
 * - `GET /api/chat/sessions/{id}` - session details
 * - `GET /api/chat/sessions/{id}/messages` - message list
 * - `POST /api/chat/sessions/{id}/messages` - send a message
 * - `PUT /api/chat/messages/{id}/read` - mark a message read
 *
 * ## Realtime
 * - `GET /hubs/chat` - WebSocket hub; authenticates on its own so that
 *   browsers can pass the token as `access_token`
 */

use crate::backend::chat::handlers::{
    get_messages, get_session, get_sessions, mark_message_read, open_session, send_message,
};
use crate::backend::middleware::auth_middleware;
use crate::backend::realtime::handle_chat_hub;
use crate::backend::server::state::AppState;
use axum::{
    middleware,
    routing::{get, put},
    Router,
};

/// Add the chat routes to `router`
pub fn configure_chat_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .route("/api/chat/sessions", get(get_sessions))
        .route("/api/chat/sessions/{id}", get(get_session).post(open_session))
        .route(
            "/api/chat/sessions/{id}/messages",
            get(get_messages).post(send_message),
        )
        .route("/api/chat/messages/{id}/read", put(mark_message_read))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    router
        .merge(api)
        .route("/hubs/chat", get(handle_chat_hub))
}
