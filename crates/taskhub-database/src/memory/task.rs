//! In-memory task store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use taskhub_core::result::AppResult;
use taskhub_core::types::{TaskId, UserId};
use taskhub_entity::task::{CreateTask, Task, TaskStatus};

use super::Sequence;
use crate::store::{TaskFilter, TaskStore};

/// Task store over a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: DashMap<TaskId, (u64, Task)>,
    seq: Sequence,
}

impl MemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: TaskId, apply: F) -> Option<Task>
    where
        F: FnOnce(&mut Task),
    {
        self.tasks.get_mut(&id).map(|mut entry| {
            let task = &mut entry.value_mut().1;
            apply(task);
            task.updated_at = Utc::now();
            task.clone()
        })
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: TaskId::new(),
            title: data.title.clone(),
            description: data.description.clone(),
            priority: data.priority,
            status: TaskStatus::Pending,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            attachments: data.attachments.clone(),
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(task.id, (self.seq.next(), task.clone()));
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        Ok(self.tasks.get(&id).map(|e| e.value().1.clone()))
    }

    async fn find(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        let mut rows: Vec<(u64, Task)> = self
            .tasks
            .iter()
            .filter(|e| filter.matches(&e.value().1))
            .map(|e| e.value().clone())
            .collect();
        rows.sort_by(|a, b| (b.1.created_at, b.0).cmp(&(a.1.created_at, a.0)));
        Ok(rows.into_iter().map(|(_, t)| t).collect())
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        Ok(self
            .tasks
            .iter()
            .filter(|e| filter.matches(&e.value().1))
            .count() as u64)
    }

    async fn assign(&self, id: TaskId, worker: UserId) -> AppResult<Option<Task>> {
        Ok(self.update(id, |task| {
            task.assigned_to = Some(worker);
            task.status = TaskStatus::Pending;
        }))
    }

    async fn update_status(&self, id: TaskId, status: &TaskStatus) -> AppResult<Option<Task>> {
        Ok(self.update(id, |task| task.status = status.clone()))
    }

    async fn update_status_for_assignee(
        &self,
        id: TaskId,
        assignee: UserId,
        status: &TaskStatus,
    ) -> AppResult<Option<Task>> {
        // The entry guard holds the shard lock across the check and the write.
        let Some(mut entry) = self.tasks.get_mut(&id) else {
            return Ok(None);
        };
        let task = &mut entry.value_mut().1;
        if !task.is_assigned_to(assignee) {
            return Ok(None);
        }
        task.status = status.clone();
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn unassign_all(&self, worker: UserId) -> AppResult<u64> {
        let mut changed = 0;
        for mut entry in self.tasks.iter_mut() {
            let task = &mut entry.value_mut().1;
            if task.is_assigned_to(worker) {
                task.assigned_to = None;
                task.updated_at = Utc::now();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_entity::task::TaskPriority;

    fn new_task(title: &str, assigned_to: Option<UserId>) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            created_by: UserId::new(),
            assigned_to,
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_filter_by_status_and_assignee() {
        let store = MemoryTaskStore::new();
        let worker = UserId::new();
        let a = store.create(&new_task("a", Some(worker))).await.unwrap();
        store.create(&new_task("b", None)).await.unwrap();
        store
            .update_status(a.id, &TaskStatus::Completed)
            .await
            .unwrap();

        let mine = TaskFilter {
            assigned_to: Some(worker),
            ..Default::default()
        };
        assert_eq!(store.count(&mine).await.unwrap(), 1);

        let done = TaskFilter {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let found = store.find(&done).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "a");
    }

    #[tokio::test]
    async fn test_assign_resets_status() {
        let store = MemoryTaskStore::new();
        let task = store.create(&new_task("t", None)).await.unwrap();
        store
            .update_status(task.id, &TaskStatus::InProgress)
            .await
            .unwrap();

        let worker = UserId::new();
        let task = store.assign(task.id, worker).await.unwrap().unwrap();
        assert_eq!(task.assigned_to, Some(worker));
        assert_eq!(task.status, TaskStatus::Pending);

        assert!(store.assign(TaskId::new(), worker).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_assignee_scoped_status_update() {
        let store = MemoryTaskStore::new();
        let owner = UserId::new();
        let task = store.create(&new_task("t", Some(owner))).await.unwrap();

        let stranger = UserId::new();
        let refused = store
            .update_status_for_assignee(task.id, stranger, &TaskStatus::Completed)
            .await
            .unwrap();
        assert!(refused.is_none());
        let unchanged = store.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, TaskStatus::Pending);

        let updated = store
            .update_status_for_assignee(task.id, owner, &TaskStatus::InProgress)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);

        store.assign(task.id, stranger).await.unwrap();
        assert!(
            store
                .update_status_for_assignee(task.id, owner, &TaskStatus::Completed)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unassign_all() {
        let store = MemoryTaskStore::new();
        let worker = UserId::new();
        let a = store.create(&new_task("a", Some(worker))).await.unwrap();
        store.create(&new_task("b", Some(worker))).await.unwrap();
        store.create(&new_task("c", Some(UserId::new()))).await.unwrap();

        assert_eq!(store.unassign_all(worker).await.unwrap(), 2);
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().assigned_to, None);
        let still_held = TaskFilter {
            assigned_to: Some(worker),
            ..Default::default()
        };
        assert_eq!(store.count(&still_held).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_newest_first() {
        let store = MemoryTaskStore::new();
        for title in ["first", "second", "third"] {
            store.create(&new_task(title, None)).await.unwrap();
        }
        let titles: Vec<String> = store
            .find(&TaskFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, ["third", "second", "first"]);
    }
}
