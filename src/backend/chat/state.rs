//! In-memory chat store
//!
//! Used when no database is configured and by the test-suite. All rows live
//! in one `ChatState` behind a `tokio::sync::RwLock`, so every compound write
//! (create-if-absent, append-and-touch) is atomic.

use crate::backend::chat::store::{ChatMessage, ChatSession, ChatSessionStore, NewChatMessage};
use crate::shared::{ChatError, MessageId, SessionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Clone, Debug, Default)]
pub struct ChatState {
    pub sessions: BTreeMap<SessionId, ChatSession>,
    pub messages: BTreeMap<MessageId, ChatMessage>,
    session_counter: i64,
    message_counter: i64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_pair(&self, user_a: UserId, user_b: UserId) -> Option<&ChatSession> {
        self.sessions
            .values()
            .find(|session| session.matches_pair(user_a, user_b))
    }

    fn insert_session(&mut self, user_a: UserId, user_b: UserId, now: DateTime<Utc>) -> ChatSession {
        self.session_counter += 1;
        let session = ChatSession {
            id: self.session_counter,
            user1_id: user_a,
            user2_id: user_b,
            created_at: now,
            updated_at: None,
            last_message_time: Some(now),
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    fn insert_message(&mut self, new: NewChatMessage) -> Result<ChatMessage, ChatError> {
        let session = self
            .sessions
            .get_mut(&new.chat_session_id)
            .ok_or_else(|| ChatError::not_found("Chat session not found."))?;

        self.message_counter += 1;
        let message = ChatMessage {
            id: self.message_counter,
            chat_session_id: new.chat_session_id,
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            text: new.text,
            sent_at: new.sent_at,
            is_read: false,
            created_at: new.sent_at,
            updated_at: None,
        };

        session.last_message_time = Some(message.sent_at);
        session.updated_at = Some(Utc::now());
        self.messages.insert(message.id, message.clone());
        Ok(message)
    }

    fn messages_of(&self, session_id: SessionId) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .values()
            .filter(move |message| message.chat_session_id == session_id)
    }
}

/// `ChatSessionStore` backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryChatStore {
    state: RwLock<ChatState>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current rows
    pub async fn snapshot(&self) -> ChatState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ChatSessionStore for InMemoryChatStore {
    async fn find_session_by_participants(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<ChatSession>, ChatError> {
        Ok(self.state.read().await.find_pair(user_a, user_b).cloned())
    }

    async fn create_session(
        &self,
        user_a: UserId,
        user_b: UserId,
        now: DateTime<Utc>,
    ) -> Result<(ChatSession, bool), ChatError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.find_pair(user_a, user_b) {
            return Ok((existing.clone(), false));
        }
        Ok((state.insert_session(user_a, user_b, now), true))
    }

    async fn get_session_by_id(&self, id: SessionId) -> Result<Option<ChatSession>, ChatError> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn append_message(&self, message: NewChatMessage) -> Result<ChatMessage, ChatError> {
        self.state.write().await.insert_message(message)
    }

    async fn list_messages_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let state = self.state.read().await;
        let mut messages: Vec<ChatMessage> = state.messages_of(session_id).cloned().collect();
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    async fn get_message_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, ChatError> {
        Ok(self.state.read().await.messages.get(&id).cloned())
    }

    async fn update_message(&self, message: &ChatMessage) -> Result<(), ChatError> {
        let mut state = self.state.write().await;
        let stored = state
            .messages
            .get_mut(&message.id)
            .ok_or_else(|| ChatError::not_found("Message not found."))?;
        stored.is_read = message.is_read;
        stored.updated_at = message.updated_at;
        Ok(())
    }

    async fn list_sessions_for_user(&self, user_id: UserId) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self
            .state
            .read()
            .await
            .sessions
            .values()
            .filter(|session| session.is_participant(user_id))
            .cloned()
            .collect())
    }

    async fn latest_messages(
        &self,
        session_ids: &[SessionId],
    ) -> Result<HashMap<SessionId, ChatMessage>, ChatError> {
        let state = self.state.read().await;
        Ok(session_ids
            .iter()
            .filter_map(|session_id| {
                state
                    .messages_of(*session_id)
                    .max_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.id.cmp(&b.id)))
                    .map(|message| (*session_id, message.clone()))
            })
            .collect())
    }

    async fn sessions_with_unread(
        &self,
        user_id: UserId,
        session_ids: &[SessionId],
    ) -> Result<HashSet<SessionId>, ChatError> {
        let state = self.state.read().await;
        Ok(session_ids
            .iter()
            .copied()
            .filter(|session_id| {
                state
                    .messages_of(*session_id)
                    .any(|message| message.receiver_id == user_id && !message.is_read)
            })
            .collect())
    }
}
