//! Application fixtures
//!
//! Three known users (Alice, Bob, Carol) on top of the in-memory stores.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use lostfound_chat::backend::auth::InMemoryUserDirectory;
use lostfound_chat::backend::chat::{ChatService, InMemoryChatStore};
use lostfound_chat::backend::realtime::RealtimeHub;
use lostfound_chat::backend::routes::create_router;
use lostfound_chat::backend::server::{build_state, AppState};
use lostfound_chat::shared::{AppConfig, UserId};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

pub const ALICE: UserId = 1;
pub const BOB: UserId = 2;
pub const CAROL: UserId = 3;

/// A user id nobody has
pub const GHOST: UserId = 404;

pub fn test_users() -> InMemoryUserDirectory {
    InMemoryUserDirectory::new()
        .with_user(ALICE, "Alice Finder")
        .with_user(BOB, "Bob Owner")
        .with_user(CAROL, "Carol Bystander")
}

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .jwt_secret(TEST_SECRET)
        .realtime_buffer(64)
        .build()
        .expect("test config is valid")
}

/// Chat service over fresh in-memory stores
pub fn chat_service() -> ChatService {
    ChatService::new(Arc::new(InMemoryChatStore::new()), Arc::new(test_users()))
}

/// Router plus the state behind it
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let state = build_state(
            test_config(),
            Arc::new(InMemoryChatStore::new()),
            Arc::new(test_users()),
            None,
        );
        let router = create_router(state.clone());
        Self { state, router }
    }

    pub fn realtime(&self) -> &RealtimeHub {
        &self.state.realtime
    }

    pub fn token(&self, user_id: UserId) -> String {
        self.realtime()
            .keys()
            .issue(user_id, &format!("user{user_id}@lostfound.local"))
            .expect("token issued")
    }

    /// Send one request and decode the JSON body (`Value::Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<UserId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user_id) = user_id {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user_id)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Open (or fetch) the session between two users over HTTP
    pub async fn open_session(&self, user_id: UserId, other_user_id: UserId) -> i64 {
        let (status, body) = self
            .request(
                Method::POST,
                &format!("/api/chat/sessions/{other_user_id}"),
                Some(user_id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "open session failed: {body}");
        body["data"]["id"].as_i64().expect("session id")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
