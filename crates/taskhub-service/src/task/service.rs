//! Task creation, assignment, status changes, and queries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use taskhub_core::error::AppError;
use taskhub_core::traits::events;
use taskhub_core::types::{TaskId, UserId};
use taskhub_database::store::{TaskFilter, TaskStore, UserStore};
use taskhub_entity::task::{CreateTask, Task, TaskPriority, TaskStatus};
use taskhub_entity::user::{User, UserRole};

use super::dispatch::StatusNotice;
use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::notification::TaskAssignment;
use crate::notification::payload::{TaskAssignedEvent, TaskUpdatedEvent};
use crate::validation::validate_request;

/// Request to create a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task title.
    #[serde(default)]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority, `medium` when absent.
    pub priority: Option<TaskPriority>,
    /// Worker to assign on creation.
    pub assigned_to: Option<UserId>,
    /// Opaque attachment references.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Request to (re)assign a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    /// Task to assign.
    pub task_id: Option<TaskId>,
    /// Worker to receive it.
    pub worker_id: Option<UserId>,
}

/// Task and worker counts for the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_tasks: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub total_workers: u64,
}

/// Task use cases. Mutations emit live task events and create the
/// matching persisted notifications.
#[derive(Debug, Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
    notifications: Arc<NotificationService>,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        users: Arc<dyn UserStore>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            tasks,
            users,
            notifications,
        }
    }

    /// Create a task, optionally assigned to a worker.
    pub async fn create_task(
        &self,
        ctx: &RequestContext,
        mut req: CreateTaskRequest,
    ) -> Result<Task, AppError> {
        ctx.require_admin()?;
        req.title = req.title.trim().to_string();
        validate_request(&req)?;

        if let Some(worker_id) = req.assigned_to {
            self.require_worker(worker_id).await?;
        }

        let task = self
            .tasks
            .create(&CreateTask {
                title: req.title,
                description: req.description,
                priority: req.priority.unwrap_or_default(),
                created_by: ctx.user_id,
                assigned_to: req.assigned_to,
                attachments: req.attachments,
            })
            .await?;

        info!(
            task_id = %task.id,
            admin_id = %ctx.user_id,
            assigned_to = ?task.assigned_to,
            "Task created"
        );

        if let Some(worker_id) = task.assigned_to {
            self.announce_assignment(ctx, &task, worker_id).await;
        }

        Ok(task)
    }

    /// Assign a task to a worker, resetting its status to `pending`.
    pub async fn assign_task(
        &self,
        ctx: &RequestContext,
        req: AssignTaskRequest,
    ) -> Result<Task, AppError> {
        ctx.require_admin()?;
        let (Some(task_id), Some(worker_id)) = (req.task_id, req.worker_id) else {
            return Err(AppError::validation("All fields are required"));
        };

        self.require_worker(worker_id).await?;
        let task = self
            .tasks
            .assign(task_id, worker_id)
            .await?
            .ok_or_else(task_not_found)?;

        info!(
            task_id = %task.id,
            worker_id = %worker_id,
            admin_id = %ctx.user_id,
            "Task assigned"
        );

        self.announce_assignment(ctx, &task, worker_id).await;
        Ok(task)
    }

    /// Overwrite a task's status.
    ///
    /// Admins may change any task. A worker may only change a task assigned
    /// to them; anything else reads as not found. For workers the
    /// assignment check is part of the write, so a reassignment that lands
    /// first wins.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        task_id: TaskId,
        status: Option<String>,
    ) -> Result<Task, AppError> {
        let status = status
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(TaskStatus::from)
            .ok_or_else(|| AppError::validation("Status is required"))?;

        let current = match self.tasks.find_by_id(task_id).await? {
            Some(task) if ctx.is_admin() || task.is_assigned_to(ctx.user_id) => task,
            _ if ctx.is_admin() => return Err(task_not_found()),
            _ => return Err(not_assigned()),
        };

        let task = if ctx.is_admin() {
            self.tasks
                .update_status(task_id, &status)
                .await?
                .ok_or_else(task_not_found)?
        } else {
            self.tasks
                .update_status_for_assignee(task_id, ctx.user_id, &status)
                .await?
                .ok_or_else(not_assigned)?
        };

        info!(
            task_id = %task.id,
            user_id = %ctx.user_id,
            old_status = %current.status,
            new_status = %task.status,
            "Task status updated"
        );

        self.publish_task_event(
            task.assigned_to,
            events::TASK_UPDATED,
            &TaskUpdatedEvent {
                task_id: task.id,
                status: task.status.clone(),
                updated_by: Some(ctx.user_id),
            },
        )
        .await;

        match StatusNotice::decide(&task, current.status, ctx.user_id, ctx.is_admin()) {
            Some(StatusNotice::Completed(event)) => {
                if let Err(e) = self.notifications.notify_task_completed(event).await {
                    warn!(task_id = %task.id, error = %e, "Completion notification failed");
                }
            }
            Some(StatusNotice::Updated(event)) => {
                if let Err(e) = self.notifications.notify_task_updated(event).await {
                    warn!(task_id = %task.id, error = %e, "Status notification failed");
                }
            }
            None => {}
        }

        Ok(task)
    }

    /// Tasks matching the filter, newest first. Admin only.
    pub async fn list_tasks(
        &self,
        ctx: &RequestContext,
        filter: TaskFilter,
    ) -> Result<Vec<Task>, AppError> {
        ctx.require_admin()?;
        self.tasks.find(&filter).await
    }

    /// A single task. Admin only.
    pub async fn get_task(&self, ctx: &RequestContext, task_id: TaskId) -> Result<Task, AppError> {
        ctx.require_admin()?;
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(task_not_found)
    }

    /// Tasks assigned to the caller, newest first.
    pub async fn my_tasks(&self, ctx: &RequestContext) -> Result<Vec<Task>, AppError> {
        self.tasks
            .find(&TaskFilter {
                assigned_to: Some(ctx.user_id),
                ..Default::default()
            })
            .await
    }

    /// Counts by status plus the number of workers. Admin only.
    pub async fn dashboard(&self, ctx: &RequestContext) -> Result<Dashboard, AppError> {
        ctx.require_admin()?;
        let by_status = |status: TaskStatus| TaskFilter {
            status: Some(status),
            ..Default::default()
        };

        Ok(Dashboard {
            total_tasks: self.tasks.count(&TaskFilter::default()).await?,
            pending: self.tasks.count(&by_status(TaskStatus::Pending)).await?,
            in_progress: self.tasks.count(&by_status(TaskStatus::InProgress)).await?,
            completed: self.tasks.count(&by_status(TaskStatus::Completed)).await?,
            total_workers: self.users.count_by_role(UserRole::Worker).await?,
        })
    }

    async fn require_worker(&self, worker_id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(worker_id)
            .await?
            .filter(|u| u.role == UserRole::Worker)
            .ok_or_else(|| AppError::not_found("Worker not found"))
    }

    /// Emit `taskAssigned` and create the assignee's notification. Neither
    /// can fail the assignment itself.
    async fn announce_assignment(&self, ctx: &RequestContext, task: &Task, worker_id: UserId) {
        self.publish_task_event(
            Some(worker_id),
            events::TASK_ASSIGNED,
            &TaskAssignedEvent {
                task_id: task.id,
                title: task.title.clone(),
                assigned_to: worker_id,
            },
        )
        .await;

        let notice = TaskAssignment {
            task_id: task.id,
            title: task.title.clone(),
            priority: Some(task.priority),
            assigned_to: worker_id,
            assigned_by: ctx.user_id,
        };
        if let Err(e) = self.notifications.notify_task_assigned(notice).await {
            warn!(task_id = %task.id, error = %e, "Assignment notification failed");
        }
    }

    /// Send a task event to the worker's room (if any) and the admin room.
    async fn publish_task_event<T: Serialize>(&self, worker: Option<UserId>, event: &str, body: &T) {
        let Some(publisher) = self.notifications.publisher() else {
            return;
        };
        let payload = match serde_json::to_value(body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(event, error = %e, "Failed to encode task event");
                return;
            }
        };

        if let Some(worker_id) = worker {
            publisher
                .publish_to_user(worker_id, event, payload.clone())
                .await;
        }
        publisher
            .publish_to_role(UserRole::Admin.as_str(), event, payload)
            .await;
    }
}

fn task_not_found() -> AppError {
    AppError::not_found("Task not found")
}

fn not_assigned() -> AppError {
    AppError::not_found("Task not found or not assigned to this worker")
}
