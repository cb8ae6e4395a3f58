//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{FromRow, Row};
use taskhub_core::types::{NotificationId, UserId};

use super::kind::NotificationType;
use super::metadata::NotificationMetadata;
use crate::task::TaskSummary;
use crate::user::UserSummary;

/// A persisted notification addressed to one recipient.
///
/// Immutable after creation except for the `is_read`/`read_at` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub recipient: UserId,
    /// The user whose action caused the notification.
    pub sender: Option<UserId>,
    /// Notification type.
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Structured context.
    pub metadata: Option<NotificationMetadata>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When it was first marked read.
    pub read_at: Option<DateTime<Utc>>,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Whether `user_id` owns this notification.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.recipient == user_id
    }
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let metadata: Option<Json<NotificationMetadata>> = row.try_get("metadata")?;
        Ok(Self {
            id: row.try_get("id")?,
            recipient: row.try_get("recipient")?,
            sender: row.try_get("sender")?,
            notification_type: row.try_get("notification_type")?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            metadata: metadata.map(|Json(m)| m),
            is_read: row.try_get("is_read")?,
            read_at: row.try_get("read_at")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Validated data for a new notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// Recipient.
    pub recipient: UserId,
    /// Originating user.
    pub sender: Option<UserId>,
    /// Notification type.
    pub notification_type: NotificationType,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Structured context.
    pub metadata: Option<NotificationMetadata>,
}

/// A notification with its sender and related task expanded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDetail {
    /// The notification itself.
    #[serde(flatten)]
    pub notification: Notification,
    /// Sender profile, when the sender still exists.
    pub sender_info: Option<UserSummary>,
    /// Related task, when the metadata names one that still exists.
    pub task: Option<TaskSummary>,
}
