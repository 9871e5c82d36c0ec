/**
 * Connection Registry
 *
 * Process-wide bookkeeping of which live connections belong to which user.
 * A user is online iff it has at least one registered connection.
 *
 * # Atomicity
 *
 * The map is a `DashMap`, sharded by user id. `add_connection` and
 * `remove_connection` each run their "was empty / became empty" check inside
 * a single `entry()` guard, so two concurrent connects (or disconnects) for
 * the same user can never both report a transition, while users living in
 * different shards do not contend at all.
 *
 * Empty sets are never retained: the entry is removed in the same guard that
 * empties it. Observing an empty set is therefore a broken invariant and
 * panics on the read path.
 *
 * The registry is ephemeral. It starts empty and is rebuilt as clients
 * reconnect.
 */

use crate::shared::UserId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of one transport connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Generate a fresh random connection id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map from user id to that user's live connection ids
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<UserId, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for a user
    ///
    /// Returns `true` iff the user had no live connection immediately before
    /// this call, which is the only trigger for an online presence event.
    /// Re-adding a known connection id is a no-op that returns `false`.
    pub fn add_connection(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let mut connections = self.connections.entry(user_id).or_default();
        let was_offline = connections.is_empty();
        connections.insert(connection_id);
        was_offline
    }

    /// Unregister a connection
    ///
    /// Returns `true` iff this removed the user's last connection. Unknown
    /// users or connection ids return `false`.
    pub fn remove_connection(&self, user_id: UserId, connection_id: &ConnectionId) -> bool {
        match self.connections.entry(user_id) {
            Entry::Occupied(mut entry) => {
                if !entry.get_mut().remove(connection_id) {
                    return false;
                }
                if entry.get().is_empty() {
                    entry.remove();
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Snapshot of a user's connections (empty if the user is offline)
    pub fn get_connections(&self, user_id: UserId) -> HashSet<ConnectionId> {
        match self.connections.get(&user_id) {
            Some(connections) => {
                assert!(
                    !connections.is_empty(),
                    "connection registry holds an empty set for user {user_id}"
                );
                connections.value().clone()
            }
            None => HashSet::new(),
        }
    }

    pub fn is_user_online(&self, user_id: UserId) -> bool {
        self.connections.contains_key(&user_id)
    }

    /// Snapshot of every online user
    pub fn get_online_users(&self) -> HashSet<UserId> {
        self.connections.iter().map(|entry| *entry.key()).collect()
    }

    pub fn online_user_count(&self) -> usize {
        self.connections.len()
    }

    /// Total number of live connections across all users
    pub fn connection_count(&self) -> usize {
        self.connections.iter().map(|entry| entry.value().len()).sum()
    }
}
