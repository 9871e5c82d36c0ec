/**
 * User Directory
 *
 * Read-only access to platform users. Profiles are owned elsewhere; the chat
 * core only needs to check that a user exists and to hydrate DTOs.
 */

use crate::shared::{ChatError, UserId, UserProfile};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::PgPool;

/// Lookup of public user profiles
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<UserProfile>, ChatError>;
}

/// User row as stored in the `users` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub is_verified: bool,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            is_verified: user.is_verified,
            profile_picture_url: user.profile_picture_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `UserDirectory` reading the `users` table
#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<UserProfile>, ChatError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, phone, is_verified, profile_picture_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(UserProfile::from))
    }
}

/// `UserDirectory` held in memory, seeded by the caller
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: DashMap<UserId, UserProfile>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, profile: UserProfile) {
        self.users.insert(profile.id, profile);
    }

    /// Add a verified user with a generated email
    pub fn with_user(self, user_id: UserId, full_name: &str) -> Self {
        self.insert(UserProfile {
            id: user_id,
            full_name: full_name.to_string(),
            email: format!("user{user_id}@lostfound.local"),
            phone: String::new(),
            is_verified: true,
            profile_picture_url: None,
            created_at: Utc::now(),
            updated_at: None,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<UserProfile>, ChatError> {
        Ok(self.users.get(&user_id).map(|user| user.value().clone()))
    }
}
