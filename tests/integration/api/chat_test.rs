//! Chat API integration tests

use crate::common::{events_of, TestApp, TestClient, ALICE, BOB, CAROL, GHOST};
use axum::http::{Method, StatusCode};
use lostfound_chat::shared::EventType;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/api/chat/sessions"),
        (Method::POST, "/api/chat/sessions/2"),
        (Method::GET, "/api/chat/sessions/1/messages"),
        (Method::PUT, "/api/chat/messages/1/read"),
    ] {
        let (status, body) = app.request(method, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["success"], json!(false));
    }
}

#[tokio::test]
async fn test_self_chat_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, &format!("/api/chat/sessions/{ALICE}"), Some(ALICE), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    crate::assert_failure_envelope!(body, "You cannot start a chat session with yourself.");
}

#[tokio::test]
async fn test_open_session_with_unknown_user_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app
        .request(Method::POST, &format!("/api/chat/sessions/{GHOST}"), Some(ALICE), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    crate::assert_failure_envelope!(body, "The user you are trying to reach does not exist.");
}

#[tokio::test]
async fn test_open_session_notifies_both_participants() {
    let app = TestApp::new();
    let mut bob = TestClient::connect(app.realtime(), BOB).await;
    bob.drain();

    let (status, body) = app
        .request(Method::POST, &format!("/api/chat/sessions/{BOB}"), Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Chat session ready."));
    assert_eq!(body["data"]["user1Id"], json!(ALICE));
    assert_eq!(body["data"]["user2Id"], json!(BOB));

    let created = events_of(&bob.drain(), EventType::SessionCreated);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["initiatorUserId"], json!(ALICE));
    assert_eq!(created[0]["targetUserId"], json!(BOB));
    assert_eq!(created[0]["sessionId"], body["data"]["id"]);
}

#[tokio::test]
async fn test_http_send_pushes_to_registered_receiver() {
    let app = TestApp::new();
    let session_id = app.open_session(ALICE, BOB).await;
    let mut bob = TestClient::connect(app.realtime(), BOB).await;
    bob.drain();

    let (status, body) = app
        .request(
            Method::POST,
            &format!("/api/chat/sessions/{session_id}/messages"),
            Some(ALICE),
            Some(json!({"text": "I have your umbrella"})),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Message sent successfully."));
    let messages = body["data"].as_array().expect("message list");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["text"], json!("I have your umbrella"));

    let pushed = events_of(&bob.drain(), EventType::ReceiveMessage);
    assert!(!pushed.is_empty());
    assert_eq!(pushed[0]["id"], messages[0]["id"]);
    assert_eq!(pushed[0]["receiverId"], json!(BOB));
}

#[tokio::test]
async fn test_send_rejects_blank_text_and_missing_body() {
    let app = TestApp::new();
    let session_id = app.open_session(ALICE, BOB).await;
    let uri = format!("/api/chat/sessions/{session_id}/messages");

    let (status, body) = app
        .request(Method::POST, &uri, Some(ALICE), Some(json!({"text": "  "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    crate::assert_failure_envelope!(body, "Message text cannot be empty.");

    let (status, body) = app.request(Method::POST, &uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    crate::assert_failure_envelope!(body, "Request body is required.");

    let (_, body) = app.request(Method::GET, &uri, Some(ALICE), None).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_outsider_gets_unauthorized() {
    let app = TestApp::new();
    let session_id = app.open_session(ALICE, BOB).await;

    let (status, body) = app
        .request(Method::GET, &format!("/api/chat/sessions/{session_id}"), Some(CAROL), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    crate::assert_failure_envelope!(body, "You are not authorized to access this chat session.");

    let (status, _) = app
        .request(Method::GET, "/api/chat/sessions/9999/messages", Some(ALICE), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_and_session_summaries() {
    let app = TestApp::new();
    let session_id = app.open_session(ALICE, BOB).await;
    let mut alice = TestClient::connect(app.realtime(), ALICE).await;

    let (_, body) = app
        .request(
            Method::POST,
            &format!("/api/chat/sessions/{session_id}/messages"),
            Some(ALICE),
            Some(json!({"text": "Come pick it up at the front desk"})),
        )
        .await;
    let message_id = body["data"][0]["id"].as_i64().expect("message id");

    let (_, body) = app.request(Method::GET, "/api/chat/sessions", Some(BOB), None).await;
    assert_eq!(body["message"], json!("Chat sessions retrieved successfully."));
    assert_eq!(body["data"][0]["hasUnreadMessages"], json!(true));
    assert_eq!(body["data"][0]["otherUser"]["id"], json!(ALICE));

    let read_uri = format!("/api/chat/messages/{message_id}/read");
    let (status, body) = app.request(Method::PUT, &read_uri, Some(ALICE), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));

    alice.drain();
    let (status, body) = app.request(Method::PUT, &read_uri, Some(BOB), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isRead"], json!(true));
    assert!(!events_of(&alice.drain(), EventType::MessageRead).is_empty());

    let (_, body) = app.request(Method::GET, "/api/chat/sessions", Some(BOB), None).await;
    assert_eq!(body["data"][0]["hasUnreadMessages"], json!(false));
}
