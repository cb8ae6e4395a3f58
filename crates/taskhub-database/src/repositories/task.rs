//! Task repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::{TaskId, UserId};
use taskhub_entity::task::{CreateTask, Task, TaskStatus};

use crate::store::{TaskFilter, TaskStore};

/// PostgreSQL-backed task store.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let now = Utc::now();
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (id, title, description, priority, status, created_by, assigned_to, attachments, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9) RETURNING *",
        )
        .bind(TaskId::new())
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority)
        .bind(TaskStatus::Pending)
        .bind(data.created_by)
        .bind(data.assigned_to)
        .bind(&data.attachments)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }

    async fn find_by_id(&self, id: TaskId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find task", e))
    }

    async fn find(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks \
             WHERE ($1::text IS NULL OR status = $1) AND ($2::uuid IS NULL OR assigned_to = $2) \
             ORDER BY created_at DESC",
        )
        .bind(filter.status.as_ref().map(TaskStatus::as_str))
        .bind(filter.assigned_to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tasks", e))
    }

    async fn count(&self, filter: &TaskFilter) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE ($1::text IS NULL OR status = $1) AND ($2::uuid IS NULL OR assigned_to = $2)",
        )
        .bind(filter.status.as_ref().map(TaskStatus::as_str))
        .bind(filter.assigned_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tasks", e))?;
        Ok(count as u64)
    }

    async fn assign(&self, id: TaskId, worker: UserId) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET assigned_to = $2, status = 'pending', updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(worker)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign task", e))
    }

    async fn update_status(&self, id: TaskId, status: &TaskStatus) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task status", e))
    }

    async fn update_status_for_assignee(
        &self,
        id: TaskId,
        assignee: UserId,
        status: &TaskStatus,
    ) -> AppResult<Option<Task>> {
        sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = $3, updated_at = NOW() \
             WHERE id = $1 AND assigned_to = $2 RETURNING *",
        )
        .bind(id)
        .bind(assignee)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update task status", e))
    }

    async fn unassign_all(&self, worker: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_to = NULL, updated_at = NOW() WHERE assigned_to = $1",
        )
        .bind(worker)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to unassign tasks", e))?;
        Ok(result.rows_affected())
    }
}
