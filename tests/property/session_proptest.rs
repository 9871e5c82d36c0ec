//! Property-based tests for session uniqueness and message ordering

use crate::common::chat_service;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_one_session_per_pair(pairs in prop::collection::vec((1..4i64, 1..4i64), 1..12)) {
        tokio_test::block_on(async {
            let chat = chat_service();
            let mut seen = std::collections::HashMap::new();

            for (a, b) in pairs {
                let result = chat.open_or_create_session(a, b).await;
                if a == b {
                    prop_assert!(result.is_err());
                    continue;
                }
                let session = result.unwrap();
                let key = (a.min(b), a.max(b));
                let id = *seen.entry(key).or_insert(session.id);
                prop_assert_eq!(session.id, id);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_messages_keep_send_order(texts in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        tokio_test::block_on(async {
            let chat = chat_service();
            let session = chat.open_or_create_session(1, 2).await.unwrap();
            for (i, text) in texts.iter().enumerate() {
                let sender = if i % 2 == 0 { 1 } else { 2 };
                chat.post_message(session.id, sender, text).await.unwrap();
            }

            let listed: Vec<String> = chat
                .get_messages(session.id, 1)
                .await
                .unwrap()
                .into_iter()
                .map(|m| m.text)
                .collect();
            prop_assert_eq!(listed, texts);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
