//! # taskhub-service
//!
//! Business logic service layer for TaskHub. Each service orchestrates the
//! store traits, credential handling, and the event publisher to implement
//! application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notification;
pub mod task;
pub mod user;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use notification::{NotificationInput, NotificationInputError, NotificationService};
pub use task::{AssignTaskRequest, CreateTaskRequest, Dashboard, TaskService};
pub use user::{AuthService, WorkerService};
