//! Addressed event publishing.
//!
//! The notification and task services emit live events through this trait.
//! The realtime gateway implements it; services never see sockets or rooms.

use async_trait::async_trait;

use crate::types::id::UserId;

/// Event names shared by publishers and the services that emit them.
pub mod events {
    /// A persisted notification, pushed to its recipient.
    pub const NOTIFICATION: &str = "notification";
    /// A task was assigned to a worker.
    pub const TASK_ASSIGNED: &str = "taskAssigned";
    /// A task changed status.
    pub const TASK_UPDATED: &str = "taskUpdated";
}

/// Publishes named events to the live sessions of a user or a role.
///
/// Delivery is best-effort to sessions attached at call time. Returns the
/// number of sessions the event was handed to; zero when nobody is online.
#[async_trait]
pub trait EventPublisher: std::fmt::Debug + Send + Sync + 'static {
    /// Deliver `event` to every session in the user's room.
    async fn publish_to_user(&self, user_id: UserId, event: &str, payload: serde_json::Value)
    -> usize;

    /// Deliver `event` to every session in the role's room.
    async fn publish_to_role(&self, role: &str, event: &str, payload: serde_json::Value) -> usize;
}
