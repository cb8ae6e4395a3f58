//! Notification creation, delivery, and read-state management.

pub mod builders;
pub mod input;
pub mod payload;
pub mod service;

pub use builders::{TaskAssignment, TaskCompletion, TaskStatusUpdate, WorkerAccountChange};
pub use input::{NotificationInput, NotificationInputError};
pub use payload::NotificationPush;
pub use service::{ListQuery, NotificationPage, NotificationService};
