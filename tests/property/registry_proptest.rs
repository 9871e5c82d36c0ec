//! Property-based tests for the connection registry
//!
//! Random connect/disconnect sequences are replayed against a plain model;
//! the registry must report exactly the model's online/offline transitions.

use lostfound_chat::backend::realtime::{ConnectionId, ConnectionRegistry};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Add(i64, u8),
    Remove(i64, u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..5i64, 0..4u8).prop_map(|(user, conn)| Op::Add(user, conn)),
        (1..5i64, 0..4u8).prop_map(|(user, conn)| Op::Remove(user, conn)),
    ]
}

fn connection_id(user_id: i64, conn: u8) -> ConnectionId {
    ConnectionId::from(format!("u{user_id}-c{conn}"))
}

proptest! {
    #[test]
    fn test_transitions_match_model(ops in prop::collection::vec(op(), 0..64)) {
        let registry = ConnectionRegistry::new();
        let mut model: HashMap<i64, HashSet<u8>> = HashMap::new();

        for op in ops {
            match op {
                Op::Add(user_id, conn) => {
                    let set = model.entry(user_id).or_default();
                    let expected = set.is_empty();
                    set.insert(conn);
                    prop_assert_eq!(registry.add_connection(user_id, connection_id(user_id, conn)), expected);
                }
                Op::Remove(user_id, conn) => {
                    let expected = match model.get_mut(&user_id) {
                        Some(set) => set.remove(&conn) && set.is_empty(),
                        _ => false,
                    };
                    if model.get(&user_id).is_some_and(HashSet::is_empty) {
                        model.remove(&user_id);
                    }
                    prop_assert_eq!(registry.remove_connection(user_id, &connection_id(user_id, conn)), expected);
                }
            }

            for user_id in 1..5i64 {
                let live = model.get(&user_id).map_or(0, HashSet::len);
                prop_assert_eq!(registry.is_user_online(user_id), live > 0);
                prop_assert_eq!(registry.get_connections(user_id).len(), live);
            }
            let online: HashSet<i64> = model.keys().copied().collect();
            prop_assert_eq!(registry.get_online_users(), online);
            prop_assert_eq!(
                registry.connection_count(),
                model.values().map(HashSet::len).sum::<usize>()
            );
        }
    }
}
