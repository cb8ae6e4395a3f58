//! Task domain entities.

pub mod model;
pub mod priority;
pub mod status;

pub use model::{CreateTask, Task, TaskSummary};
pub use priority::TaskPriority;
pub use status::TaskStatus;
