//! Structured payload attached to a notification.

use serde::{Deserialize, Serialize};
use taskhub_core::types::{TaskId, UserId};

use crate::task::{TaskPriority, TaskStatus};

/// Context carried by a notification, one variant per event family.
///
/// Serialized with a `kind` discriminator and camelCase fields, e.g.
/// `{"kind":"status_change","taskId":"…","taskTitle":"…","oldStatus":"pending","newStatus":"completed"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationMetadata {
    /// A task was assigned.
    #[serde(rename_all = "camelCase")]
    TaskAssigned {
        task_id: TaskId,
        task_title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<TaskPriority>,
    },
    /// A task moved from one status to another.
    #[serde(rename_all = "camelCase")]
    StatusChange {
        task_id: TaskId,
        task_title: String,
        old_status: TaskStatus,
        new_status: TaskStatus,
    },
    /// A task was completed.
    #[serde(rename_all = "camelCase")]
    TaskCompleted { task_id: TaskId, task_title: String },
    /// A worker account changed.
    #[serde(rename_all = "camelCase")]
    Worker { worker_id: UserId },
    /// Free-form data.
    #[serde(rename_all = "camelCase")]
    General { additional_data: serde_json::Value },
}

impl NotificationMetadata {
    /// The task this metadata refers to, if any.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Self::TaskAssigned { task_id, .. }
            | Self::StatusChange { task_id, .. }
            | Self::TaskCompleted { task_id, .. } => Some(*task_id),
            Self::Worker { .. } | Self::General { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_change_wire_shape() {
        let task_id = TaskId::new();
        let meta = NotificationMetadata::StatusChange {
            task_id,
            task_title: "Paint fence".into(),
            old_status: TaskStatus::Pending,
            new_status: TaskStatus::Other("blocked".into()),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "status_change");
        assert_eq!(json["taskId"], task_id.to_string());
        assert_eq!(json["oldStatus"], "pending");
        assert_eq!(json["newStatus"], "blocked");

        let back: NotificationMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
        assert_eq!(back.task_id(), Some(task_id));
    }

    #[test]
    fn test_priority_omitted_when_absent() {
        let meta = NotificationMetadata::TaskAssigned {
            task_id: TaskId::new(),
            task_title: "t".into(),
            priority: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("priority").is_none());
    }

    #[test]
    fn test_worker_has_no_task() {
        let meta = NotificationMetadata::Worker {
            worker_id: UserId::new(),
        };
        assert_eq!(meta.task_id(), None);
    }
}
