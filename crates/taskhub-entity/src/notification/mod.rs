//! Notification domain entities.

pub mod kind;
pub mod metadata;
pub mod model;

pub use kind::NotificationType;
pub use metadata::NotificationMetadata;
pub use model::{CreateNotification, Notification, NotificationDetail};
