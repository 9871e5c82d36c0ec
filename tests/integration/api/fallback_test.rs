//! Server started without a database

use crate::common::TEST_SECRET;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use lostfound_chat::backend::auth::JwtKeys;
use lostfound_chat::backend::server::create_app;
use lostfound_chat::shared::AppConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_in_memory_server_serves_seeded_users() {
    let config = AppConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "CHAT_SEED_USERS" => Some("1:Alice Finder,2:Bob Owner".to_string()),
        _ => None,
    })
    .unwrap();
    assert!(config.database_url.is_none());

    let app = create_app(config).await;
    let keys = JwtKeys::new(TEST_SECRET, 3600);
    let alice = keys.issue(1, "alice@lostfound.local").unwrap();
    let bob = keys.issue(2, "bob@lostfound.local").unwrap();

    let (status, body) = call(&app, Method::POST, "/api/chat/sessions/2", &alice, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user2"]["fullName"], json!("Bob Owner"));
    let session_id = body["data"]["id"].as_i64().unwrap();

    let uri = format!("/api/chat/sessions/{session_id}/messages");
    let (status, body) = call(
        &app,
        Method::POST,
        &uri,
        &alice,
        Some(json!({"text": "Your cat is safe with me"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = call(&app, Method::GET, &uri, &bob, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["text"], json!("Your cat is safe with me"));

    // ids outside the seed list stay unknown
    let (status, _) = call(&app, Method::POST, "/api/chat/sessions/3", &alice, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
