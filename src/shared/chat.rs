//! Chat Data Transfer Objects
//!
//! Wire shapes returned by both the HTTP endpoints and the realtime hub.
//! Field names are camelCase on the wire so polling and realtime clients
//! can share one model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a platform user
pub type UserId = i64;

/// Identifier of a 1:1 chat session
pub type SessionId = i64;

/// Identifier of a chat message
pub type MessageId = i64;

/// Public profile of a user, as served by the user directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A message in a chat session, hydrated with participant profiles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub id: MessageId,
    pub chat_session_id: SessionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub sender: Option<UserProfile>,
    pub receiver: Option<UserProfile>,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full view of a session with both participants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionDetailsDto {
    pub id: SessionId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub user1: Option<UserProfile>,
    pub user2: Option<UserProfile>,
    pub created_at: DateTime<Utc>,
    pub last_message_time: Option<DateTime<Utc>>,
}

impl ChatSessionDetailsDto {
    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: UserId) -> UserId {
        if self.user1_id == user_id {
            self.user2_id
        } else {
            self.user1_id
        }
    }
}

/// One row of a user's session list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionSummaryDto {
    pub id: SessionId,
    pub other_user: Option<UserProfile>,
    pub last_message: Option<ChatMessageDto>,
    pub created_at: DateTime<Utc>,
    /// Time of the most recent activity, falling back to `created_at`
    pub last_message_time: DateTime<Utc>,
    pub has_unread_messages: bool,
}

/// Body of `POST /api/chat/sessions/{session_id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendChatMessageRequest {
    pub text: String,
}

/// Response envelope shared by every HTTP endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl<T> BaseResponse<T> {
    /// Successful response carrying `data`
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Failed response without data
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            errors: Vec::new(),
        }
    }
}
