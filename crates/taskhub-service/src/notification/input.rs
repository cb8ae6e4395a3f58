//! Raw notification input and its validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::types::UserId;
use taskhub_entity::notification::{CreateNotification, NotificationMetadata, NotificationType};

/// Rejected notification input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotificationInputError {
    /// No recipient was given.
    #[error("Recipient is required")]
    MissingRecipient,
    /// No type was given.
    #[error("Notification type is required")]
    MissingType,
    /// Title or message is blank.
    #[error("Title and message are required")]
    MissingContent,
}

impl From<NotificationInputError> for AppError {
    fn from(err: NotificationInputError) -> Self {
        AppError::with_source(ErrorKind::Validation, err.to_string(), err)
    }
}

/// Unvalidated request to create a notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationInput {
    /// Recipient.
    pub recipient: Option<UserId>,
    /// Originating user.
    pub sender: Option<UserId>,
    /// Notification type.
    pub notification_type: Option<NotificationType>,
    /// Title.
    pub title: String,
    /// Message.
    pub message: String,
    /// Structured context.
    pub metadata: Option<NotificationMetadata>,
}

impl NotificationInput {
    /// Check required fields and produce the store payload.
    pub fn validate(self) -> Result<CreateNotification, NotificationInputError> {
        let recipient = self
            .recipient
            .ok_or(NotificationInputError::MissingRecipient)?;
        let notification_type = self
            .notification_type
            .ok_or(NotificationInputError::MissingType)?;
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(NotificationInputError::MissingContent);
        }
        Ok(CreateNotification {
            recipient,
            sender: self.sender,
            notification_type,
            title: self.title,
            message: self.message,
            metadata: self.metadata,
        })
    }
}
