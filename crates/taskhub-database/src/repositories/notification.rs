//! Notification repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::{NotificationId, PageRequest, UserId};
use taskhub_entity::notification::{CreateNotification, Notification};

use crate::store::NotificationStore;

/// PostgreSQL-backed notification store.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, data: &CreateNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, recipient, sender, notification_type, title, message, metadata, is_read, read_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NULL, $8) RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(data.recipient)
        .bind(data.sender)
        .bind(data.notification_type)
        .bind(&data.title)
        .bind(&data.message)
        .bind(data.metadata.as_ref().map(Json))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))
    }

    async fn find_by_recipient(
        &self,
        recipient: UserId,
        is_read: Option<bool>,
        page: &PageRequest,
    ) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications \
             WHERE recipient = $1 AND ($2::boolean IS NULL OR is_read = $2) \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
        )
        .bind(recipient)
        .bind(is_read)
        .bind(page.limit as i64)
        .bind(page.sql_offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn count_by_recipient(&self, recipient: UserId, is_read: Option<bool>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient = $1 AND ($2::boolean IS NULL OR is_read = $2)",
        )
        .bind(recipient)
        .bind(is_read)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
        })?;
        Ok(count as u64)
    }

    async fn find_owned(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE id = $1 AND recipient = $2",
        )
        .bind(id)
        .bind(recipient)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND recipient = $2 RETURNING *",
        )
        .bind(id)
        .bind(recipient)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))
    }

    async fn mark_many_read(&self, recipient: UserId, ids: &[NotificationId]) -> AppResult<u64> {
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_uuid()).collect();
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE recipient = $1 AND id = ANY($2) AND is_read = FALSE",
        )
        .bind(recipient)
        .bind(&ids)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, recipient: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE recipient = $1 AND is_read = FALSE",
        )
        .bind(recipient)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_owned(&self, id: NotificationId, recipient: UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient = $2")
            .bind(id)
            .bind(recipient)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_read(&self, recipient: UserId) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE recipient = $1 AND is_read = TRUE")
                .bind(recipient)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete read notifications", e)
                })?;
        Ok(result.rows_affected())
    }

    async fn delete_for_recipient(&self, recipient: UserId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE recipient = $1")
            .bind(recipient)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete notifications", e)
            })?;
        Ok(result.rows_affected())
    }
}
