//! Health endpoint and hub upgrade tests

use crate::common::{TestApp, TestClient, ALICE};
use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_health_reports_presence() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "onlineUsers": 0, "connections": 0}));

    let _tab1 = TestClient::connect(app.realtime(), ALICE).await;
    let _tab2 = TestClient::connect(app.realtime(), ALICE).await;

    let (_, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(body["onlineUsers"], json!(1));
    assert_eq!(body["connections"], json!(2));
}

#[tokio::test]
async fn test_hub_rejects_missing_token_before_upgrade() {
    let app = TestApp::new();

    let (status, body) = app.request(Method::GET, "/hubs/chat", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    let (status, _) = app
        .request(Method::GET, "/hubs/chat?access_token=garbage", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.realtime().registry().connection_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();
    let (status, _) = app.request(Method::GET, "/api/lost-items", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
