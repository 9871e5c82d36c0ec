//! Chat service behaviour across sessions, messages and summaries

use crate::common::{chat_service, ALICE, BOB, CAROL, GHOST};
use assert_matches::assert_matches;
use lostfound_chat::shared::ChatError;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_finder_and_owner_conversation() {
    let chat = chat_service();

    let session = crate::assert_ok!(chat.open_or_create_session(ALICE, BOB).await);
    assert_eq!((session.user1_id, session.user2_id), (ALICE, BOB));
    assert_eq!(session.user2.as_ref().map(|u| u.full_name.as_str()), Some("Bob Owner"));

    let messages = crate::assert_ok!(chat.send_message(session.id, ALICE, "  I found your keys  ").await);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, "I found your keys");
    assert_eq!(messages[0].receiver_id, BOB);
    assert!(!messages[0].is_read);

    let messages = crate::assert_ok!(chat.send_message(session.id, BOB, "Thank you!").await);
    let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["I found your keys", "Thank you!"]);

    let bob_sessions = crate::assert_ok!(chat.get_user_sessions(BOB).await);
    assert_eq!(bob_sessions.len(), 1);
    assert!(bob_sessions[0].has_unread_messages);
    assert_eq!(
        bob_sessions[0].last_message.as_ref().map(|m| m.text.as_str()),
        Some("Thank you!")
    );
    assert_eq!(bob_sessions[0].other_user.as_ref().map(|u| u.id), Some(ALICE));

    let read = crate::assert_ok!(chat.mark_message_as_read(messages[0].id, BOB).await);
    assert!(read.is_read);
    let bob_sessions = crate::assert_ok!(chat.get_user_sessions(BOB).await);
    assert!(!bob_sessions[0].has_unread_messages);

    // Alice still has Bob's reply unread
    let alice_sessions = crate::assert_ok!(chat.get_user_sessions(ALICE).await);
    assert!(alice_sessions[0].has_unread_messages);
}

#[tokio::test]
async fn test_open_session_is_symmetric_and_idempotent() {
    let chat = chat_service();

    let first = chat.open_session(ALICE, BOB).await.unwrap();
    let again = chat.open_session(ALICE, BOB).await.unwrap();
    let reverse = chat.open_session(BOB, ALICE).await.unwrap();

    assert!(first.created);
    assert!(!again.created);
    assert!(!reverse.created);
    assert_eq!(first.session.id, again.session.id);
    assert_eq!(first.session.id, reverse.session.id);
}

#[tokio::test]
async fn test_concurrent_opens_share_one_session() {
    let chat = chat_service();

    let (a, b) = tokio::join!(
        chat.open_or_create_session(ALICE, BOB),
        chat.open_or_create_session(BOB, ALICE)
    );

    assert_eq!(a.unwrap().id, b.unwrap().id);
    assert_eq!(chat.get_user_sessions(ALICE).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_open_session_rejections() {
    let chat = chat_service();

    assert_matches!(
        chat.open_or_create_session(ALICE, ALICE).await,
        Err(ChatError::InvalidArgument { .. })
    );
    assert_matches!(
        chat.open_or_create_session(ALICE, GHOST).await,
        Err(ChatError::NotFound { .. })
    );
    assert!(chat.get_user_sessions(ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_outsider_cannot_read_or_write() {
    let chat = chat_service();
    let session = chat.open_or_create_session(ALICE, BOB).await.unwrap();
    chat.send_message(session.id, ALICE, "hello").await.unwrap();

    assert_matches!(
        chat.get_session_details(session.id, CAROL).await,
        Err(ChatError::Unauthorized { .. })
    );
    assert_matches!(
        chat.get_messages(session.id, CAROL).await,
        Err(ChatError::Unauthorized { .. })
    );
    assert_matches!(
        chat.send_message(session.id, CAROL, "let me in").await,
        Err(ChatError::Unauthorized { .. })
    );
    assert_matches!(chat.get_messages(999, ALICE).await, Err(ChatError::NotFound { .. }));

    assert_eq!(chat.get_messages(session.id, BOB).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_message_persists_nothing() {
    let chat = chat_service();
    let session = chat.open_or_create_session(ALICE, BOB).await.unwrap();

    assert_matches!(
        chat.send_message(session.id, ALICE, "   \n\t").await,
        Err(ChatError::InvalidArgument { message }) if message == "Message text cannot be empty."
    );

    assert!(chat.get_messages(session.id, ALICE).await.unwrap().is_empty());
    let details = chat.get_session_details(session.id, ALICE).await.unwrap();
    assert_eq!(details.last_message_time, session.last_message_time);
}

#[tokio::test]
async fn test_only_receiver_marks_read() {
    let chat = chat_service();
    let session = chat.open_or_create_session(ALICE, BOB).await.unwrap();
    let message = chat.post_message(session.id, ALICE, "is this yours?").await.unwrap();

    assert_matches!(
        chat.mark_message_as_read(message.id, ALICE).await,
        Err(ChatError::Unauthorized { .. })
    );
    assert_matches!(
        chat.mark_message_as_read(message.id + 100, BOB).await,
        Err(ChatError::NotFound { .. })
    );

    let first = chat.mark_message_as_read(message.id, BOB).await.unwrap();
    let second = chat.mark_message_as_read(message.id, BOB).await.unwrap();
    assert!(first.is_read);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_sessions_ordered_by_latest_activity() {
    let chat = chat_service();
    let with_bob = chat.open_or_create_session(ALICE, BOB).await.unwrap();
    let with_carol = chat.open_or_create_session(ALICE, CAROL).await.unwrap();

    chat.post_message(with_bob.id, BOB, "newer activity").await.unwrap();

    let sessions = chat.get_user_sessions(ALICE).await.unwrap();
    let ids: Vec<i64> = sessions.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![with_bob.id, with_carol.id]);
    assert!(sessions[1].last_message.is_none());
    assert!(!sessions[1].has_unread_messages);
}

#[tokio::test]
async fn test_session_peer() {
    let chat = chat_service();
    let session = chat.open_or_create_session(ALICE, BOB).await.unwrap();

    assert_eq!(chat.session_peer(session.id, ALICE).await.unwrap(), BOB);
    assert_eq!(chat.session_peer(session.id, BOB).await.unwrap(), ALICE);
    assert_matches!(
        chat.session_peer(session.id, CAROL).await,
        Err(ChatError::Unauthorized { .. })
    );
}

#[tokio::test]
async fn test_send_and_list_returns_the_stored_message() {
    let chat = chat_service();
    let session = chat.open_or_create_session(ALICE, BOB).await.unwrap();
    chat.post_message(session.id, BOB, "Where did you find it?").await.unwrap();

    let sent = chat.send_and_list(session.id, ALICE, " Near the library ").await.unwrap();

    assert_eq!(sent.message.text, "Near the library");
    assert_eq!(sent.message.sender_id, ALICE);
    assert_eq!(sent.messages.len(), 2);
    assert_eq!(sent.messages.last(), Some(&sent.message));
    assert_eq!(sent.messages, chat.get_messages(session.id, BOB).await.unwrap());
}
