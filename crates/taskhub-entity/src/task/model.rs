//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskhub_core::types::{TaskId, UserId};

use super::priority::TaskPriority;
use super::status::TaskStatus;

/// A unit of work created by an admin and optionally assigned to a worker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Workflow status.
    pub status: TaskStatus,
    /// The admin who created the task.
    pub created_by: UserId,
    /// The worker the task is assigned to.
    pub assigned_to: Option<UserId>,
    /// Opaque attachment references.
    pub attachments: Vec<String>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Whether `user_id` is the current assignee.
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.assigned_to == Some(user_id)
    }

    /// Title, status, priority and description for embedding elsewhere.
    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id,
            title: self.title.clone(),
            status: self.status.clone(),
            priority: self.priority,
            description: self.description.clone(),
        }
    }
}

/// Data required to create a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Task title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: TaskPriority,
    /// Creating admin.
    pub created_by: UserId,
    /// Initial assignee.
    pub assigned_to: Option<UserId>,
    /// Attachment references.
    pub attachments: Vec<String>,
}

/// Compact task view embedded in notification details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    /// Task identifier.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Description.
    pub description: Option<String>,
}
