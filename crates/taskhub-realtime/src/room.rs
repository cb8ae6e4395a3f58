//! Named rooms of live sessions.
//!
//! Every session sits in its user's room and its role's room for its whole
//! lifetime. Rooms exist only while they have members.

use std::collections::HashSet;

use dashmap::DashMap;

use taskhub_core::types::{ConnectionId, UserId};

/// Room name for one user's sessions.
pub fn user_room(user_id: UserId) -> String {
    format!("user:{user_id}")
}

/// Room name for every session of a role.
pub fn role_room(role: &str) -> String {
    format!("role:{role}")
}

/// Room membership with a reverse index for cheap cleanup on disconnect.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    members: DashMap<String, HashSet<ConnectionId>>,
    joined: DashMap<ConnectionId, Vec<String>>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to a room.
    pub fn join(&self, room: String, conn_id: ConnectionId) {
        if self.members.entry(room.clone()).or_default().insert(conn_id) {
            self.joined.entry(conn_id).or_default().push(room);
        }
    }

    /// Remove a session from every room it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let Some((_, rooms)) = self.joined.remove(&conn_id) else {
            return;
        };
        for room in rooms {
            if let Some(mut set) = self.members.get_mut(&room) {
                set.remove(&conn_id);
            }
            self.members.remove_if(&room, |_, set| set.is_empty());
        }
    }

    /// Sessions currently in `room`.
    pub fn members(&self, room: &str) -> Vec<ConnectionId> {
        self.members
            .get(room)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Rooms `conn_id` has joined.
    pub fn rooms_of(&self, conn_id: ConnectionId) -> Vec<String> {
        self.joined
            .get(&conn_id)
            .map(|rooms| rooms.clone())
            .unwrap_or_default()
    }

    /// Number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_leave() {
        let rooms = RoomRegistry::new();
        let user = UserId::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());

        rooms.join(user_room(user), a);
        rooms.join(role_room("admin"), a);
        rooms.join(role_room("admin"), b);
        rooms.join(role_room("admin"), b);

        assert_eq!(rooms.members(&user_room(user)), vec![a]);
        assert_eq!(rooms.members("role:admin").len(), 2);
        assert_eq!(rooms.rooms_of(b), vec!["role:admin".to_string()]);

        rooms.leave_all(a);
        assert!(rooms.members(&user_room(user)).is_empty());
        assert_eq!(rooms.members("role:admin"), vec![b]);
        assert_eq!(rooms.room_count(), 1);

        rooms.leave_all(b);
        rooms.leave_all(b);
        assert_eq!(rooms.room_count(), 0);
    }
}
