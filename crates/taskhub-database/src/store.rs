//! Store traits.
//!
//! Services depend on these traits only. [`crate::repositories`] implements
//! them over PostgreSQL and [`crate::memory`] over in-process maps.

use std::fmt::Debug;

use async_trait::async_trait;

use taskhub_core::result::AppResult;
use taskhub_core::types::{NotificationId, PageRequest, TaskId, UserId};
use taskhub_entity::notification::{CreateNotification, Notification};
use taskhub_entity::task::{CreateTask, Task, TaskStatus};
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserRole};

/// Identity store.
#[async_trait]
pub trait UserStore: Debug + Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a user. A duplicate email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Change a user's display name.
    async fn update_name(&self, id: UserId, name: &str) -> AppResult<Option<User>>;

    /// Apply the set fields of `changes`. Taking an email another user holds
    /// is a `Conflict`.
    async fn update_account(&self, id: UserId, changes: &UpdateUser) -> AppResult<Option<User>>;

    /// Remove a user. `false` when there was no such user.
    async fn delete(&self, id: UserId) -> AppResult<bool>;

    /// All users holding `role`, newest first.
    async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>>;

    /// Number of users holding `role`.
    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

/// Filter for task listings. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Exact assignee match.
    pub assigned_to: Option<UserId>,
}

impl TaskFilter {
    /// Whether `task` passes this filter.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.as_ref().is_none_or(|s| *s == task.status)
            && self.assigned_to.is_none_or(|u| task.assigned_to == Some(u))
    }
}

/// Task store.
#[async_trait]
pub trait TaskStore: Debug + Send + Sync + 'static {
    /// Insert a task with status `pending`.
    async fn create(&self, data: &CreateTask) -> AppResult<Task>;

    /// Find a task by primary key.
    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>>;

    /// Tasks matching `filter`, newest first.
    async fn find(&self, filter: &TaskFilter) -> AppResult<Vec<Task>>;

    /// Number of tasks matching `filter`.
    async fn count(&self, filter: &TaskFilter) -> AppResult<u64>;

    /// Set the assignee and reset status to `pending`.
    async fn assign(&self, id: TaskId, worker: UserId) -> AppResult<Option<Task>>;

    /// Overwrite the status.
    async fn update_status(&self, id: TaskId, status: &TaskStatus) -> AppResult<Option<Task>>;

    /// Overwrite the status only while the task is assigned to `assignee`.
    /// The check and the write are one step. `None` when the task is
    /// missing or assigned elsewhere.
    async fn update_status_for_assignee(
        &self,
        id: TaskId,
        assignee: UserId,
        status: &TaskStatus,
    ) -> AppResult<Option<Task>>;

    /// Clear the assignee on every task held by `worker`. Returns how many
    /// tasks changed.
    async fn unassign_all(&self, worker: UserId) -> AppResult<u64>;
}

/// Notification store. Every read and write is scoped to a recipient.
#[async_trait]
pub trait NotificationStore: Debug + Send + Sync + 'static {
    /// Insert a notification with `is_read = false` and no `read_at`.
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification>;

    /// One page of a recipient's notifications, newest first, optionally
    /// filtered on read state.
    async fn find_by_recipient(
        &self,
        recipient: UserId,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<Vec<Notification>>;

    /// Number of a recipient's notifications matching the read-state filter.
    async fn count_by_recipient(&self, recipient: UserId, is_read: Option<bool>) -> AppResult<u64>;

    /// Find a notification only if `recipient` owns it.
    async fn find_owned(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>>;

    /// Mark one owned notification read. An already-read notification keeps
    /// its original `read_at`. `None` when not found or not owned.
    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>>;

    /// Mark the listed owned, unread notifications read. Returns how many changed.
    async fn mark_many_read(&self, recipient: UserId, ids: &[NotificationId]) -> AppResult<u64>;

    /// Mark every unread notification of the recipient read. Returns how many changed.
    async fn mark_all_read(&self, recipient: UserId) -> AppResult<u64>;

    /// Delete one owned notification. `false` when not found or not owned.
    async fn delete_owned(&self, id: NotificationId, recipient: UserId) -> AppResult<bool>;

    /// Delete every read notification of the recipient. Returns how many went.
    async fn delete_all_read(&self, recipient: UserId) -> AppResult<u64>;

    /// Delete every notification addressed to the recipient, read or not.
    /// Notifications the recipient sent are kept.
    async fn delete_for_recipient(&self, recipient: UserId) -> AppResult<u64>;
}
