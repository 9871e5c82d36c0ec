/**
 * Session Handlers
 */

use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::RealtimeHub;
use crate::shared::{
    BaseResponse, ChatSessionDetailsDto, ChatSessionSummaryDto, SessionCreatedPayload, SessionId,
    UserId,
};
use axum::{
    extract::{Path, State},
    Json,
};

/// List the caller's sessions (GET /api/chat/sessions)
pub async fn get_sessions(
    State(chat): State<ChatService>,
    AuthUser(user): AuthUser,
) -> Result<Json<BaseResponse<Vec<ChatSessionSummaryDto>>>, BackendError> {
    let sessions = chat.get_user_sessions(user.user_id).await?;
    Ok(Json(BaseResponse::success(
        sessions,
        "Chat sessions retrieved successfully.",
    )))
}

/// Open or create the session with another user (POST /api/chat/sessions/{id})
///
/// Both participants are notified with `SessionCreated`, also when the
/// session already existed, so every open tab learns about it.
pub async fn open_session(
    State(realtime): State<RealtimeHub>,
    AuthUser(user): AuthUser,
    Path(other_user_id): Path<UserId>,
) -> Result<Json<BaseResponse<ChatSessionDetailsDto>>, BackendError> {
    let opened = realtime.chat().open_session(user.user_id, other_user_id).await?;

    realtime
        .dispatcher()
        .on_session_created(&SessionCreatedPayload::new(opened.session.clone(), user.user_id))
        .await;

    Ok(Json(BaseResponse::success(opened.session, "Chat session ready.")))
}

/// Session details (GET /api/chat/sessions/{id})
pub async fn get_session(
    State(chat): State<ChatService>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<SessionId>,
) -> Result<Json<BaseResponse<ChatSessionDetailsDto>>, BackendError> {
    let session = chat.get_session_details(session_id, user.user_id).await?;
    Ok(Json(BaseResponse::success(session, "Chat session loaded.")))
}
