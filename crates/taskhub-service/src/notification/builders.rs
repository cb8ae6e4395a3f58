//! Notifications for task lifecycle events.

use serde::{Deserialize, Serialize};

use taskhub_core::error::AppError;
use taskhub_core::types::{TaskId, UserId};
use taskhub_entity::notification::{Notification, NotificationMetadata, NotificationType};
use taskhub_entity::task::{TaskPriority, TaskStatus};

use super::input::NotificationInput;
use super::service::NotificationService;

/// A task was assigned to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskAssignment {
    pub task_id: TaskId,
    pub title: String,
    pub priority: Option<TaskPriority>,
    pub assigned_to: UserId,
    pub assigned_by: UserId,
}

/// A task moved between statuses. `recipient` is the counterpart of the
/// actor: the assignee when an admin acts, the creator when the worker acts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub task_id: TaskId,
    pub title: String,
    pub status: TaskStatus,
    pub old_status: TaskStatus,
    pub updated_by: UserId,
    pub recipient: UserId,
}

/// An admin changed or removed a worker account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerAccountChange {
    pub worker_id: UserId,
    pub worker_name: String,
    pub changed_by: UserId,
}

/// A task reached `completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: TaskId,
    pub title: String,
    pub completed_by: UserId,
    pub assigned_to: Option<UserId>,
    pub created_by: Option<UserId>,
}

impl NotificationService {
    /// Tell the assignee about a new assignment.
    pub async fn notify_task_assigned(
        &self,
        event: TaskAssignment,
    ) -> Result<Notification, AppError> {
        self.create_and_emit(NotificationInput {
            recipient: Some(event.assigned_to),
            sender: Some(event.assigned_by),
            notification_type: Some(NotificationType::TaskAssigned),
            title: "New Task Assigned".to_string(),
            message: format!("You have been assigned a new task: \"{}\"", event.title),
            metadata: Some(NotificationMetadata::TaskAssigned {
                task_id: event.task_id,
                task_title: event.title,
                priority: event.priority,
            }),
        })
        .await
    }

    /// Tell the counterpart about a status change.
    pub async fn notify_task_updated(
        &self,
        event: TaskStatusUpdate,
    ) -> Result<Notification, AppError> {
        self.create_and_emit(NotificationInput {
            recipient: Some(event.recipient),
            sender: Some(event.updated_by),
            notification_type: Some(NotificationType::TaskStatusChanged),
            title: "Task Status Updated".to_string(),
            message: format!(
                "Task \"{}\" status changed from {} to {}",
                event.title, event.old_status, event.status
            ),
            metadata: Some(NotificationMetadata::StatusChange {
                task_id: event.task_id,
                task_title: event.title,
                old_status: event.old_status,
                new_status: event.status,
            }),
        })
        .await
    }

    /// Tell the creator (or, lacking one, the assignee) that a task is done.
    pub async fn notify_task_completed(
        &self,
        event: TaskCompletion,
    ) -> Result<Notification, AppError> {
        self.create_and_emit(NotificationInput {
            recipient: event.created_by.or(event.assigned_to),
            sender: Some(event.completed_by),
            notification_type: Some(NotificationType::TaskCompleted),
            title: "Task Completed".to_string(),
            message: format!("Task \"{}\" has been marked as completed", event.title),
            metadata: Some(NotificationMetadata::TaskCompleted {
                task_id: event.task_id,
                task_title: event.title,
            }),
        })
        .await
    }

    /// Tell a worker an admin edited their account.
    pub async fn notify_worker_updated(
        &self,
        event: &WorkerAccountChange,
    ) -> Result<Notification, AppError> {
        self.create_and_emit(NotificationInput {
            recipient: Some(event.worker_id),
            sender: Some(event.changed_by),
            notification_type: Some(NotificationType::WorkerUpdated),
            title: "Account Updated".to_string(),
            message: "Your account details were updated by an administrator".to_string(),
            metadata: Some(NotificationMetadata::Worker {
                worker_id: event.worker_id,
            }),
        })
        .await
    }

    /// Tell another admin that a worker account was removed.
    pub async fn notify_worker_deleted(
        &self,
        event: &WorkerAccountChange,
        admin: UserId,
    ) -> Result<Notification, AppError> {
        self.create_and_emit(NotificationInput {
            recipient: Some(admin),
            sender: Some(event.changed_by),
            notification_type: Some(NotificationType::WorkerDeleted),
            title: "Worker Removed".to_string(),
            message: format!("Worker \"{}\" has been removed", event.worker_name),
            metadata: Some(NotificationMetadata::Worker {
                worker_id: event.worker_id,
            }),
        })
        .await
    }
}
