/**
 * Message Handlers
 */

use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::RealtimeHub;
use crate::shared::{BaseResponse, ChatMessageDto, MessageId, SendChatMessageRequest, SessionId};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

/// Messages of a session (GET /api/chat/sessions/{id}/messages)
pub async fn get_messages(
    State(chat): State<ChatService>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<SessionId>,
) -> Result<Json<BaseResponse<Vec<ChatMessageDto>>>, BackendError> {
    let messages = chat.get_messages(session_id, user.user_id).await?;
    Ok(Json(BaseResponse::success(messages, "Messages loaded successfully.")))
}

/// Send a message (POST /api/chat/sessions/{id}/messages)
///
/// Broadcasts the stored message as `ReceiveMessage` and answers with the
/// session's full message list.
pub async fn send_message(
    State(realtime): State<RealtimeHub>,
    AuthUser(user): AuthUser,
    Path(session_id): Path<SessionId>,
    body: Result<Json<SendChatMessageRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<Vec<ChatMessageDto>>>, BackendError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!("[Chat] Rejected message body: {}", e);
        BackendError::handler(StatusCode::BAD_REQUEST, "Request body is required.")
    })?;

    let sent = realtime
        .chat()
        .send_and_list(session_id, user.user_id, &request.text)
        .await?;
    realtime.dispatcher().on_message_sent(&sent.message).await;

    Ok(Json(BaseResponse::success(sent.messages, "Message sent successfully.")))
}

/// Mark a message read (PUT /api/chat/messages/{id}/read)
pub async fn mark_message_read(
    State(realtime): State<RealtimeHub>,
    AuthUser(user): AuthUser,
    Path(message_id): Path<MessageId>,
) -> Result<Json<BaseResponse<ChatMessageDto>>, BackendError> {
    let message = realtime
        .chat()
        .mark_message_as_read(message_id, user.user_id)
        .await?;
    realtime.dispatcher().on_message_read(&message).await;

    Ok(Json(BaseResponse::success(message, "Message marked as read.")))
}
