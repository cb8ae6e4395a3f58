//! Connection registry: which users have at least one live session.

use std::collections::HashSet;

use dashmap::DashMap;

use taskhub_core::types::{ConnectionId, UserId};

/// Maps each online user to the set of their live session ids.
///
/// A user is online exactly when their set is non-empty; empty sets are
/// never left behind.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<UserId, HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a session. Returns `true` when this made the user online.
    pub fn add(&self, user_id: UserId, conn_id: ConnectionId) -> bool {
        let mut set = self.sessions.entry(user_id).or_default();
        set.insert(conn_id);
        set.len() == 1
    }

    /// Forget a session. Returns `true` when this made the user offline.
    ///
    /// The emptied set is removed conditionally so a session added
    /// concurrently for the same user is kept.
    pub fn remove(&self, user_id: UserId, conn_id: ConnectionId) -> bool {
        let removed = match self.sessions.get_mut(&user_id) {
            Some(mut set) => set.remove(&conn_id),
            None => return false,
        };
        removed
            && self
                .sessions
                .remove_if(&user_id, |_, set| set.is_empty())
                .is_some()
    }

    /// Whether the user has at least one live session.
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.sessions.contains_key(&user_id)
    }

    /// Number of online users.
    pub fn online_count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all online users.
    pub fn online_user_ids(&self) -> Vec<UserId> {
        self.sessions.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of live sessions for one user.
    pub fn session_count(&self, user_id: UserId) -> usize {
        self.sessions.get(&user_id).map_or(0, |set| set.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_online_while_any_session_remains() {
        let registry = ConnectionRegistry::new();
        let user = UserId::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());

        assert!(registry.add(user, a));
        assert!(!registry.add(user, b));
        assert!(registry.is_online(user));
        assert_eq!(registry.session_count(user), 2);

        assert!(!registry.remove(user, a));
        assert!(registry.is_online(user));
        assert!(registry.remove(user, b));
        assert!(!registry.is_online(user));
        assert_eq!(registry.online_count(), 0);
    }

    #[test]
    fn test_removing_unknown_session_is_noop() {
        let registry = ConnectionRegistry::new();
        let user = UserId::new();
        registry.add(user, ConnectionId::new());

        assert!(!registry.remove(user, ConnectionId::new()));
        assert!(!registry.remove(UserId::new(), ConnectionId::new()));
        assert!(registry.is_online(user));
    }

    #[test]
    fn test_online_user_ids() {
        let registry = ConnectionRegistry::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        registry.add(u1, ConnectionId::new());
        registry.add(u2, ConnectionId::new());

        let mut ids = registry.online_user_ids();
        ids.sort_by_key(|id| id.into_uuid());
        let mut expected = vec![u1, u2];
        expected.sort_by_key(|id| id.into_uuid());
        assert_eq!(ids, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_churn_leaves_consistent_state() {
        let registry = Arc::new(ConnectionRegistry::new());
        let user = UserId::new();
        let keeper = ConnectionId::new();
        registry.add(user, keeper);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let conn = ConnectionId::new();
                    registry.add(user, conn);
                    registry.remove(user, conn);
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert!(registry.is_online(user));
        assert_eq!(registry.session_count(user), 1);
        assert!(registry.remove(user, keeper));
        assert!(!registry.is_online(user));
    }
}
