//! Live payloads emitted by the notification and task services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::types::{NotificationId, TaskId, UserId};
use taskhub_entity::notification::{Notification, NotificationMetadata, NotificationType};
use taskhub_entity::task::TaskStatus;

/// Body of the `notification` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPush {
    /// Persisted notification id.
    pub notification_id: NotificationId,
    /// Recipient.
    pub recipient: UserId,
    /// Notification type.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Structured context.
    pub metadata: Option<NotificationMetadata>,
    /// Creation time of the persisted record.
    pub timestamp: DateTime<Utc>,
}

impl From<&Notification> for NotificationPush {
    fn from(n: &Notification) -> Self {
        Self {
            notification_id: n.id,
            recipient: n.recipient,
            notification_type: n.notification_type,
            title: n.title.clone(),
            message: n.message.clone(),
            metadata: n.metadata.clone(),
            timestamp: n.created_at,
        }
    }
}

/// Body of the `taskAssigned` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignedEvent {
    /// Task id.
    pub task_id: TaskId,
    /// Task title.
    pub title: String,
    /// New assignee.
    pub assigned_to: UserId,
}

/// Body of the `taskUpdated` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdatedEvent {
    /// Task id.
    pub task_id: TaskId,
    /// New status.
    pub status: TaskStatus,
    /// Who changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserId>,
}
