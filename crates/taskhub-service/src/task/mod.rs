//! Task mutations and queries, and the notifications they trigger.

pub mod dispatch;
pub mod service;

pub use dispatch::StatusNotice;
pub use service::{AssignTaskRequest, CreateTaskRequest, Dashboard, TaskService};
