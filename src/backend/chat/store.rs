//! Chat Persistence Boundary
//!
//! Rows stored for sessions and messages, and the [`ChatSessionStore`] trait
//! the chat service persists through. Two implementations ship with the crate:
//! [`crate::backend::chat::state::InMemoryChatStore`] and
//! [`crate::backend::chat::db::PgChatStore`].

use crate::shared::{ChatError, MessageId, SessionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Stored 1:1 session
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ChatSession {
    pub id: SessionId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_message_time: Option<DateTime<Utc>>,
}

impl ChatSession {
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: UserId) -> UserId {
        if self.user1_id == user_id {
            self.user2_id
        } else {
            self.user1_id
        }
    }

    /// Whether this session binds exactly the unordered pair `{a, b}`
    pub fn matches_pair(&self, a: UserId, b: UserId) -> bool {
        (self.user1_id == a && self.user2_id == b) || (self.user1_id == b && self.user2_id == a)
    }

    /// Ordering key for session lists
    pub fn activity_time(&self) -> DateTime<Utc> {
        self.last_message_time.unwrap_or(self.created_at)
    }
}

/// Stored message
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: MessageId,
    pub chat_session_id: SessionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Message about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChatMessage {
    pub chat_session_id: SessionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Durable storage for sessions and messages
///
/// Message lists are always ordered by `(sent_at, id)` ascending.
#[async_trait]
pub trait ChatSessionStore: Send + Sync {
    /// Session binding the unordered pair `{user_a, user_b}`, if any
    async fn find_session_by_participants(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<ChatSession>, ChatError>;

    /// Create the session for `{user_a, user_b}`
    ///
    /// If a concurrent writer created it first, that session is returned
    /// instead with `false`, so at most one session exists per pair.
    async fn create_session(
        &self,
        user_a: UserId,
        user_b: UserId,
        now: DateTime<Utc>,
    ) -> Result<(ChatSession, bool), ChatError>;

    async fn get_session_by_id(&self, id: SessionId) -> Result<Option<ChatSession>, ChatError>;

    /// Insert a message and stamp the session's `last_message_time` and
    /// `updated_at` in one transaction
    async fn append_message(&self, message: NewChatMessage) -> Result<ChatMessage, ChatError>;

    async fn list_messages_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ChatMessage>, ChatError>;

    async fn get_message_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, ChatError>;

    /// Persist `is_read` and `updated_at` of an existing message
    async fn update_message(&self, message: &ChatMessage) -> Result<(), ChatError>;

    async fn list_sessions_for_user(&self, user_id: UserId) -> Result<Vec<ChatSession>, ChatError>;

    /// Most recent message of each given session, by `(sent_at, id)`
    async fn latest_messages(
        &self,
        session_ids: &[SessionId],
    ) -> Result<HashMap<SessionId, ChatMessage>, ChatError>;

    /// Sessions among `session_ids` holding an unread message addressed to `user_id`
    async fn sessions_with_unread(
        &self,
        user_id: UserId,
        session_ids: &[SessionId],
    ) -> Result<HashSet<SessionId>, ChatError>;
}
