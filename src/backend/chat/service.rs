//! Chat Service
//!
//! Domain rules for 1:1 sessions and their messages. Every operation returns
//! `Result<_, ChatError>`; the HTTP handlers and the realtime hub map the error
//! kind to whatever their client understands.

use crate::backend::auth::UserDirectory;
use crate::backend::chat::store::{ChatMessage, ChatSession, ChatSessionStore, NewChatMessage};
use crate::shared::{
    ChatError, ChatMessageDto, ChatSessionDetailsDto, ChatSessionSummaryDto, MessageId, SessionId,
    UserId, UserProfile,
};
use chrono::Utc;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

/// Result of opening a session, with whether it was created by this call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOpened {
    pub session: ChatSessionDetailsDto,
    pub created: bool,
}

/// A stored message together with its session's refreshed message list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSent {
    pub message: ChatMessageDto,
    pub messages: Vec<ChatMessageDto>,
}

#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn ChatSessionStore>,
    users: Arc<dyn UserDirectory>,
}

impl ChatService {
    pub fn new(store: Arc<dyn ChatSessionStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self { store, users }
    }

    /// Return the session between two users, creating it if needed
    pub async fn open_or_create_session(
        &self,
        current_user_id: UserId,
        other_user_id: UserId,
    ) -> Result<ChatSessionDetailsDto, ChatError> {
        Ok(self.open_session(current_user_id, other_user_id).await?.session)
    }

    /// Same as [`Self::open_or_create_session`], also reporting creation
    pub async fn open_session(
        &self,
        current_user_id: UserId,
        other_user_id: UserId,
    ) -> Result<SessionOpened, ChatError> {
        if current_user_id == other_user_id {
            return Err(ChatError::invalid_argument(
                "You cannot start a chat session with yourself.",
            ));
        }

        if self.users.get_user_by_id(other_user_id).await?.is_none() {
            return Err(ChatError::not_found(
                "The user you are trying to reach does not exist.",
            ));
        }

        let (session, created) = match self
            .store
            .find_session_by_participants(current_user_id, other_user_id)
            .await?
        {
            Some(session) => (session, false),
            None => {
                self.store
                    .create_session(current_user_id, other_user_id, Utc::now())
                    .await?
            }
        };

        if created {
            tracing::info!(
                "[Chat] Opened new session {} between {} and {}",
                session.id,
                current_user_id,
                other_user_id
            );
        }

        Ok(SessionOpened {
            session: self.session_details(&session).await?,
            created,
        })
    }

    pub async fn get_session_details(
        &self,
        session_id: SessionId,
        requesting_user_id: UserId,
    ) -> Result<ChatSessionDetailsDto, ChatError> {
        let session = self.authorized_session(session_id, requesting_user_id).await?;
        self.session_details(&session).await
    }

    /// Messages of a session, ascending by `(sent_at, id)`
    pub async fn get_messages(
        &self,
        session_id: SessionId,
        requesting_user_id: UserId,
    ) -> Result<Vec<ChatMessageDto>, ChatError> {
        let session = self.authorized_session(session_id, requesting_user_id).await?;
        self.session_messages(&session).await
    }

    /// Store a message and return the session's refreshed message list
    pub async fn send_message(
        &self,
        session_id: SessionId,
        sender_id: UserId,
        text: &str,
    ) -> Result<Vec<ChatMessageDto>, ChatError> {
        Ok(self.send_and_list(session_id, sender_id, text).await?.messages)
    }

    /// Same as [`Self::send_message`], also returning the stored message so
    /// callers can broadcast exactly that one
    pub async fn send_and_list(
        &self,
        session_id: SessionId,
        sender_id: UserId,
        text: &str,
    ) -> Result<MessageSent, ChatError> {
        let message = self.post_message(session_id, sender_id, text).await?;
        let session = self.authorized_session(message.chat_session_id, sender_id).await?;
        let messages = self.session_messages(&session).await?;
        Ok(MessageSent { message, messages })
    }

    /// Store a message and return only that message
    pub async fn post_message(
        &self,
        session_id: SessionId,
        sender_id: UserId,
        text: &str,
    ) -> Result<ChatMessageDto, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::invalid_argument("Message text cannot be empty."));
        }

        let session = self.authorized_session(session_id, sender_id).await?;
        let receiver_id = session.other_participant(sender_id);

        let stored = self
            .store
            .append_message(NewChatMessage {
                chat_session_id: session.id,
                sender_id,
                receiver_id,
                text: text.to_string(),
                sent_at: Utc::now(),
            })
            .await?;

        tracing::debug!(
            "[Chat] Stored message {} in session {} from {} to {}",
            stored.id,
            session.id,
            sender_id,
            receiver_id
        );

        let profiles = self.profiles(&[sender_id, receiver_id]).await?;
        Ok(message_dto(stored, &profiles))
    }

    /// Mark a message read on behalf of its receiver
    ///
    /// Already-read messages are returned unchanged.
    pub async fn mark_message_as_read(
        &self,
        message_id: MessageId,
        user_id: UserId,
    ) -> Result<ChatMessageDto, ChatError> {
        let mut message = self
            .store
            .get_message_by_id(message_id)
            .await?
            .ok_or_else(|| ChatError::not_found("Message not found."))?;

        if message.receiver_id != user_id {
            return Err(ChatError::unauthorized(
                "You can only mark your own received messages as read.",
            ));
        }

        if !message.is_read {
            message.is_read = true;
            message.updated_at = Some(Utc::now());
            self.store.update_message(&message).await?;
            tracing::debug!("[Chat] Message {} marked read by {}", message.id, user_id);
        }

        let profiles = self.profiles(&[message.sender_id, message.receiver_id]).await?;
        Ok(message_dto(message, &profiles))
    }

    /// Sessions of a user, most recently active first
    pub async fn get_user_sessions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ChatSessionSummaryDto>, ChatError> {
        let mut sessions = self.store.list_sessions_for_user(user_id).await?;
        sessions.sort_by_key(|session| Reverse((session.activity_time(), session.id)));

        let ids: Vec<SessionId> = sessions.iter().map(|session| session.id).collect();
        let mut latest = self.store.latest_messages(&ids).await?;
        let unread = self.store.sessions_with_unread(user_id, &ids).await?;

        let mut participants: Vec<UserId> = sessions
            .iter()
            .map(|session| session.other_participant(user_id))
            .collect();
        participants.push(user_id);
        let profiles = self.profiles(&participants).await?;

        Ok(sessions
            .into_iter()
            .map(|session| ChatSessionSummaryDto {
                id: session.id,
                other_user: profiles.get(&session.other_participant(user_id)).cloned(),
                last_message: latest
                    .remove(&session.id)
                    .map(|message| message_dto(message, &profiles)),
                created_at: session.created_at,
                last_message_time: session.activity_time(),
                has_unread_messages: unread.contains(&session.id),
            })
            .collect())
    }

    /// The other participant of a session, checking that `user_id` belongs to it
    pub async fn session_peer(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<UserId, ChatError> {
        let session = self.authorized_session(session_id, user_id).await?;
        Ok(session.other_participant(user_id))
    }

    async fn authorized_session(
        &self,
        session_id: SessionId,
        user_id: UserId,
    ) -> Result<ChatSession, ChatError> {
        let session = self
            .store
            .get_session_by_id(session_id)
            .await?
            .ok_or_else(|| ChatError::not_found("Chat session not found."))?;

        if !session.is_participant(user_id) {
            tracing::warn!("[Chat] User {} denied access to session {}", user_id, session_id);
            return Err(ChatError::unauthorized(
                "You are not authorized to access this chat session.",
            ));
        }
        Ok(session)
    }

    async fn session_details(
        &self,
        session: &ChatSession,
    ) -> Result<ChatSessionDetailsDto, ChatError> {
        let profiles = self.profiles(&[session.user1_id, session.user2_id]).await?;
        Ok(ChatSessionDetailsDto {
            id: session.id,
            user1_id: session.user1_id,
            user2_id: session.user2_id,
            user1: profiles.get(&session.user1_id).cloned(),
            user2: profiles.get(&session.user2_id).cloned(),
            created_at: session.created_at,
            last_message_time: session.last_message_time,
        })
    }

    async fn session_messages(
        &self,
        session: &ChatSession,
    ) -> Result<Vec<ChatMessageDto>, ChatError> {
        let mut messages = self.store.list_messages_by_session(session.id).await?;
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at).then(a.id.cmp(&b.id)));

        let profiles = self.profiles(&[session.user1_id, session.user2_id]).await?;
        Ok(messages
            .into_iter()
            .map(|message| message_dto(message, &profiles))
            .collect())
    }

    async fn profiles(
        &self,
        user_ids: &[UserId],
    ) -> Result<HashMap<UserId, UserProfile>, ChatError> {
        let mut profiles = HashMap::new();
        for user_id in user_ids {
            if profiles.contains_key(user_id) {
                continue;
            }
            if let Some(profile) = self.users.get_user_by_id(*user_id).await? {
                profiles.insert(*user_id, profile);
            }
        }
        Ok(profiles)
    }
}

fn message_dto(message: ChatMessage, profiles: &HashMap<UserId, UserProfile>) -> ChatMessageDto {
    ChatMessageDto {
        id: message.id,
        chat_session_id: message.chat_session_id,
        sender_id: message.sender_id,
        receiver_id: message.receiver_id,
        sender: profiles.get(&message.sender_id).cloned(),
        receiver: profiles.get(&message.receiver_id).cloned(),
        text: message.text,
        sent_at: message.sent_at,
        is_read: message.is_read,
        created_at: message.created_at,
        updated_at: message.updated_at,
    }
}
