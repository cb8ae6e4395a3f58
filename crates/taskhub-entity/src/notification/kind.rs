//! Notification type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to produce a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A task was assigned to the recipient.
    TaskAssigned,
    /// A task the recipient is involved in was edited.
    TaskUpdated,
    /// A task changed status.
    TaskStatusChanged,
    /// A task created by the recipient was completed.
    TaskCompleted,
    /// A worker account was created.
    WorkerCreated,
    /// A worker account was updated.
    WorkerUpdated,
    /// A worker account was removed.
    WorkerDeleted,
    /// Anything else.
    General,
}

impl NotificationType {
    /// Return the type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskUpdated => "task_updated",
            Self::TaskStatusChanged => "task_status_changed",
            Self::TaskCompleted => "task_completed",
            Self::WorkerCreated => "worker_created",
            Self::WorkerUpdated => "worker_updated",
            Self::WorkerDeleted => "worker_deleted",
            Self::General => "general",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
