/**
 * Database Operations for Chat Sessions and Messages
 *
 * PostgreSQL implementation of `ChatSessionStore`. Queries are plain
 * `sqlx::query_as` calls against the tables created by `migrations/`.
 */

use crate::backend::chat::store::{ChatMessage, ChatSession, ChatSessionStore, NewChatMessage};
use crate::shared::{ChatError, MessageId, SessionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

impl From<sqlx::Error> for ChatError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("[Chat] Database error: {:?}", err);
        ChatError::unavailable(err.to_string())
    }
}

const SESSION_COLUMNS: &str = "id, user1_id, user2_id, created_at, updated_at, last_message_time";
const MESSAGE_COLUMNS: &str =
    "id, chat_session_id, sender_id, receiver_id, text, sent_at, is_read, created_at, updated_at";

/// `ChatSessionStore` backed by a PostgreSQL pool
#[derive(Clone, Debug)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatSessionStore for PgChatStore {
    async fn find_session_by_participants(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> Result<Option<ChatSession>, ChatError> {
        let session = sqlx::query_as::<_, ChatSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM chat_sessions
            WHERE (user1_id = $1 AND user2_id = $2)
               OR (user1_id = $2 AND user2_id = $1)
            "#
        ))
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Insert, or fall through to the row a concurrent writer created
    ///
    /// The unique pair index turns a lost race into `ON CONFLICT DO NOTHING`.
    async fn create_session(
        &self,
        user_a: UserId,
        user_b: UserId,
        now: DateTime<Utc>,
    ) -> Result<(ChatSession, bool), ChatError> {
        let inserted = sqlx::query_as::<_, ChatSession>(&format!(
            r#"
            INSERT INTO chat_sessions (user1_id, user2_id, created_at, last_message_time)
            VALUES ($1, $2, $3, $3)
            ON CONFLICT DO NOTHING
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(user_a)
        .bind(user_b)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(session) = inserted {
            tracing::info!("[Chat] Created session {} for users {} and {}", session.id, user_a, user_b);
            return Ok((session, true));
        }

        let existing = self
            .find_session_by_participants(user_a, user_b)
            .await?
            .ok_or_else(|| ChatError::unavailable("Chat session vanished after conflict."))?;
        Ok((existing, false))
    }

    async fn get_session_by_id(&self, id: SessionId) -> Result<Option<ChatSession>, ChatError> {
        let session = sqlx::query_as::<_, ChatSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM chat_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn append_message(&self, message: NewChatMessage) -> Result<ChatMessage, ChatError> {
        let mut tx = self.pool.begin().await?;

        let stored = sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            INSERT INTO chat_messages (chat_session_id, sender_id, receiver_id, text, sent_at, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $5)
            RETURNING {MESSAGE_COLUMNS}
            "#
        ))
        .bind(message.chat_session_id)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(&message.text)
        .bind(message.sent_at)
        .fetch_one(&mut *tx)
        .await?;

        let touched = sqlx::query(
            r#"
            UPDATE chat_sessions
            SET last_message_time = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(message.chat_session_id)
        .bind(message.sent_at)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(ChatError::not_found("Chat session not found."));
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn list_messages_by_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let messages = sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            SELECT {MESSAGE_COLUMNS}
            FROM chat_messages
            WHERE chat_session_id = $1
            ORDER BY sent_at ASC, id ASC
            "#
        ))
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    async fn get_message_by_id(&self, id: MessageId) -> Result<Option<ChatMessage>, ChatError> {
        let message = sqlx::query_as::<_, ChatMessage>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM chat_messages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    async fn update_message(&self, message: &ChatMessage) -> Result<(), ChatError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages
            SET is_read = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(message.id)
        .bind(message.is_read)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ChatError::not_found("Message not found."));
        }
        Ok(())
    }

    async fn list_sessions_for_user(&self, user_id: UserId) -> Result<Vec<ChatSession>, ChatError> {
        let sessions = sqlx::query_as::<_, ChatSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM chat_sessions
            WHERE user1_id = $1 OR user2_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn latest_messages(
        &self,
        session_ids: &[SessionId],
    ) -> Result<HashMap<SessionId, ChatMessage>, ChatError> {
        if session_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let messages = sqlx::query_as::<_, ChatMessage>(&format!(
            r#"
            SELECT DISTINCT ON (chat_session_id) {MESSAGE_COLUMNS}
            FROM chat_messages
            WHERE chat_session_id = ANY($1)
            ORDER BY chat_session_id, sent_at DESC, id DESC
            "#
        ))
        .bind(session_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages
            .into_iter()
            .map(|message| (message.chat_session_id, message))
            .collect())
    }

    async fn sessions_with_unread(
        &self,
        user_id: UserId,
        session_ids: &[SessionId],
    ) -> Result<HashSet<SessionId>, ChatError> {
        if session_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<(SessionId,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT chat_session_id
            FROM chat_messages
            WHERE chat_session_id = ANY($1) AND receiver_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(session_ids)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
