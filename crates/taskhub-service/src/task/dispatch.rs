//! Which notification a status change produces.

use taskhub_core::types::UserId;
use taskhub_entity::task::{Task, TaskStatus};

use crate::notification::{TaskCompletion, TaskStatusUpdate};

/// The single notification owed for a status change, if any.
#[derive(Debug, Clone)]
pub enum StatusNotice {
    /// The task was completed; tell its creator.
    Completed(TaskCompletion),
    /// Any other change; tell the counterpart of the actor.
    Updated(TaskStatusUpdate),
}

impl StatusNotice {
    /// Decide the notice for `task` (already holding its new status) moving
    /// away from `old_status` because of `actor`.
    ///
    /// Completion goes to the creator and suppresses the generic update.
    /// Otherwise an admin's change goes to the assignee and a worker's
    /// change goes to the creator. Returns `None` when nobody is owed one.
    pub fn decide(
        task: &Task,
        old_status: TaskStatus,
        actor: UserId,
        actor_is_admin: bool,
    ) -> Option<Self> {
        if task.status.is_completed() {
            return Some(Self::Completed(TaskCompletion {
                task_id: task.id,
                title: task.title.clone(),
                completed_by: actor,
                assigned_to: task.assigned_to,
                created_by: Some(task.created_by),
            }));
        }

        let counterpart = if actor_is_admin {
            task.assigned_to
        } else {
            Some(task.created_by)
        };

        counterpart.map(|recipient| {
            Self::Updated(TaskStatusUpdate {
                task_id: task.id,
                title: task.title.clone(),
                status: task.status.clone(),
                old_status,
                updated_by: actor,
                recipient,
            })
        })
    }
}
