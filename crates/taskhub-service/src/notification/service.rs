//! Notification persistence, live delivery, and the recipient-scoped query API.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use taskhub_core::config::notification::NotificationConfig;
use taskhub_core::error::AppError;
use taskhub_core::traits::{EventPublisher, events};
use taskhub_core::types::{NotificationId, PageInfo, PageRequest, UserId};
use taskhub_database::store::{NotificationStore, TaskStore, UserStore};
use taskhub_entity::notification::{Notification, NotificationDetail};

use super::input::NotificationInput;
use super::payload::NotificationPush;
use crate::context::RequestContext;

/// Query parameters for listing a recipient's notifications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only read (`true`) or only unread (`false`) notifications.
    pub is_read: Option<bool>,
    /// Page number, 1-based.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

/// One page of notifications plus the recipient's unread total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    /// Notifications on this page, newest first.
    pub items: Vec<Notification>,
    /// Pagination block.
    pub pagination: PageInfo,
    /// Unread notifications across all pages.
    pub unread_count: u64,
}

/// Creates notifications, pushes them to live sessions, and serves the
/// recipient's history.
#[derive(Debug, Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
    publisher: Option<Arc<dyn EventPublisher>>,
    paging: NotificationConfig,
}

impl NotificationService {
    /// Creates a new notification service without live delivery.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        paging: NotificationConfig,
    ) -> Self {
        Self {
            store,
            users,
            tasks,
            publisher: None,
            paging,
        }
    }

    /// Attach the publisher used for live delivery.
    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// The attached publisher, if any.
    pub fn publisher(&self) -> Option<&Arc<dyn EventPublisher>> {
        self.publisher.as_ref()
    }

    /// Validate, persist, and push a notification to its recipient.
    ///
    /// Nothing is persisted when validation fails. Without a publisher, or
    /// with the recipient offline, the record is still persisted and
    /// returned. Persistence failures propagate.
    pub async fn create_and_emit(&self, input: NotificationInput) -> Result<Notification, AppError> {
        let data = input.validate()?;
        let notification = self.store.create(&data).await?;

        info!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            kind = %notification.notification_type,
            "Notification created"
        );

        self.push(&notification).await;
        Ok(notification)
    }

    /// Deliver an already-persisted notification to the recipient's live
    /// sessions. Failures are logged, never returned.
    async fn push(&self, notification: &Notification) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        let payload = match serde_json::to_value(NotificationPush::from(notification)) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    notification_id = %notification.id,
                    error = %e,
                    "Failed to encode notification push"
                );
                return;
            }
        };
        let delivered = publisher
            .publish_to_user(notification.recipient, events::NOTIFICATION, payload)
            .await;
        debug!(
            notification_id = %notification.id,
            delivered,
            "Notification pushed to live sessions"
        );
    }

    /// List the caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        query: &ListQuery,
    ) -> Result<NotificationPage, AppError> {
        let page = PageRequest::bounded(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(self.paging.default_page_size),
            self.paging.max_page_size,
        );

        let items = self
            .store
            .find_by_recipient(ctx.user_id, query.is_read, &page)
            .await?;
        let total = self
            .store
            .count_by_recipient(ctx.user_id, query.is_read)
            .await?;
        let unread_count = self.unread_count(ctx).await?;

        Ok(NotificationPage {
            items,
            pagination: PageInfo::new(&page, total),
            unread_count,
        })
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.store.count_by_recipient(ctx.user_id, Some(false)).await
    }

    /// One of the caller's notifications with sender and task expanded.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> Result<NotificationDetail, AppError> {
        let notification = self.find_owned(ctx, id).await?;

        let sender_info = match notification.sender {
            Some(sender) => self.users.find_by_id(sender).await?.map(|u| u.summary()),
            None => None,
        };
        let task_id = notification.metadata.as_ref().and_then(|m| m.task_id());
        let task = match task_id {
            Some(task_id) => self.tasks.find_by_id(task_id).await?.map(|t| t.summary()),
            None => None,
        };

        Ok(NotificationDetail {
            notification,
            sender_info,
            task,
        })
    }

    /// Mark one of the caller's notifications read.
    ///
    /// Idempotent: an already-read notification keeps its `read_at`.
    pub async fn mark_as_read(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        self.store
            .mark_read(id, ctx.user_id)
            .await?
            .ok_or_else(not_found)
    }

    /// Mark several of the caller's notifications read. Ids the caller does
    /// not own are ignored.
    pub async fn mark_many_as_read(
        &self,
        ctx: &RequestContext,
        ids: &[NotificationId],
    ) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.store.mark_many_read(ctx.user_id, ids).await
    }

    /// Mark all of the caller's unread notifications read.
    pub async fn mark_all_as_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let modified = self.store.mark_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, modified, "Marked all notifications read");
        Ok(modified)
    }

    /// Delete one of the caller's notifications.
    pub async fn delete(&self, ctx: &RequestContext, id: NotificationId) -> Result<(), AppError> {
        if self.store.delete_owned(id, ctx.user_id).await? {
            Ok(())
        } else {
            Err(not_found())
        }
    }

    /// Delete every read notification of the caller.
    pub async fn delete_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let deleted = self.store.delete_all_read(ctx.user_id).await?;
        info!(user_id = %ctx.user_id, deleted, "Cleared read notifications");
        Ok(deleted)
    }

    /// Drop every notification addressed to a user whose account is going
    /// away. Notifications that user sent stay with their recipients.
    pub async fn purge_recipient(&self, user_id: UserId) -> Result<u64, AppError> {
        let deleted = self.store.delete_for_recipient(user_id).await?;
        info!(user_id = %user_id, deleted, "Purged notifications of removed user");
        Ok(deleted)
    }

    async fn find_owned(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        self.store
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(not_found)
    }
}

fn not_found() -> AppError {
    AppError::not_found("Notification not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, RecordingPublisher};
    use taskhub_core::ErrorKind;
    use taskhub_entity::notification::{NotificationMetadata, NotificationType};

    fn input(recipient: UserId, title: &str) -> NotificationInput {
        NotificationInput {
            recipient: Some(recipient),
            notification_type: Some(NotificationType::General),
            title: title.into(),
            message: format!("{title} body"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_created_unread_and_pushed() {
        let fx = Fixture::new();
        let worker = fx.worker("w1@example.com").await;

        let n = fx
            .notifications
            .create_and_emit(input(worker.id, "Hello"))
            .await
            .unwrap();
        assert!(!n.is_read);
        assert!(n.read_at.is_none());

        let pushed = fx.publisher.user_events(worker.id);
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].0, "notification");
        assert_eq!(pushed[0].1["notificationId"], n.id.to_string());
        assert_eq!(pushed[0].1["type"], "general");
        assert_eq!(
            pushed[0].1["timestamp"],
            serde_json::to_value(n.created_at).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_recipient_persists_nothing() {
        let fx = Fixture::new();
        let mut bad = input(UserId::new(), "x");
        bad.recipient = None;

        let err = fx.notifications.create_and_emit(bad).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Recipient is required");
        assert!(fx.notification_store.is_empty());
        assert!(fx.publisher.all().is_empty());
    }

    #[tokio::test]
    async fn test_without_publisher_still_persists() {
        let fx = Fixture::without_publisher();
        let worker = fx.worker("w@example.com").await;
        let n = fx
            .notifications
            .create_and_emit(input(worker.id, "Quiet"))
            .await
            .unwrap();

        let page = fx
            .notifications
            .list(&fx.ctx(&worker), &ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, n.id);
    }

    #[tokio::test]
    async fn test_mark_read_twice_keeps_read_at() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let ctx = fx.ctx(&worker);
        let n = fx
            .notifications
            .create_and_emit(input(worker.id, "n"))
            .await
            .unwrap();

        let first = fx.notifications.mark_as_read(&ctx, n.id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = fx.notifications.mark_as_read(&ctx, n.id).await.unwrap();

        assert!(first.is_read && second.is_read);
        assert!(first.read_at.is_some());
        assert_eq!(first.read_at, second.read_at);
    }

    #[tokio::test]
    async fn test_second_page_holds_items_eleven_to_twenty() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        for i in 1..=25 {
            fx.notifications
                .create_and_emit(input(worker.id, &format!("n{i:02}")))
                .await
                .unwrap();
        }

        let page = fx
            .notifications
            .list(
                &fx.ctx(&worker),
                &ListQuery {
                    page: Some(2),
                    limit: Some(10),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let titles: Vec<&str> = page.items.iter().map(|n| n.title.as_str()).collect();
        let expected: Vec<String> = (6..=15).rev().map(|i| format!("n{i:02}")).collect();
        assert_eq!(titles, expected);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.total_count, 25);
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.unread_count, 25);
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let page = fx
            .notifications
            .list(
                &fx.ctx(&worker),
                &ListQuery {
                    limit: Some(5_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.pagination.limit, 100);
        assert_eq!(page.pagination.total_pages, 0);
    }

    #[tokio::test]
    async fn test_mark_all_clears_unread() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let ctx = fx.ctx(&worker);
        for i in 0..4 {
            fx.notifications
                .create_and_emit(input(worker.id, &format!("n{i}")))
                .await
                .unwrap();
        }
        let listed = fx.notifications.list(&ctx, &ListQuery::default()).await.unwrap();
        fx.notifications
            .mark_as_read(&ctx, listed.items[0].id)
            .await
            .unwrap();

        assert_eq!(fx.notifications.mark_all_as_read(&ctx).await.unwrap(), 3);
        assert_eq!(fx.notifications.unread_count(&ctx).await.unwrap(), 0);

        let after = fx.notifications.list(&ctx, &ListQuery::default()).await.unwrap();
        assert!(after.items.iter().all(|n| n.is_read && n.read_at.is_some()));
    }

    #[tokio::test]
    async fn test_foreign_notification_is_not_found() {
        let fx = Fixture::new();
        let w1 = fx.worker("w1@example.com").await;
        let w2 = fx.worker("w2@example.com").await;
        let n = fx
            .notifications
            .create_and_emit(input(w1.id, "mine"))
            .await
            .unwrap();

        let intruder = fx.ctx(&w2);
        for err in [
            fx.notifications.mark_as_read(&intruder, n.id).await.unwrap_err(),
            fx.notifications.get(&intruder, n.id).await.unwrap_err(),
            fx.notifications.delete(&intruder, n.id).await.unwrap_err(),
        ] {
            assert_eq!(err.kind, ErrorKind::NotFound);
        }

        let owner_view = fx.notifications.get(&fx.ctx(&w1), n.id).await.unwrap();
        assert!(!owner_view.notification.is_read);
    }

    #[tokio::test]
    async fn test_get_expands_sender_and_task() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let worker = fx.worker("w@example.com").await;
        let task = fx.task(&admin, "Inspect pump", None).await;

        let n = fx
            .notifications
            .create_and_emit(NotificationInput {
                recipient: Some(worker.id),
                sender: Some(admin.id),
                notification_type: Some(NotificationType::TaskCompleted),
                title: "t".into(),
                message: "m".into(),
                metadata: Some(NotificationMetadata::TaskCompleted {
                    task_id: task.id,
                    task_title: task.title.clone(),
                }),
            })
            .await
            .unwrap();

        let detail = fx.notifications.get(&fx.ctx(&worker), n.id).await.unwrap();
        assert_eq!(detail.sender_info.map(|s| s.email), Some(admin.email));
        assert_eq!(detail.task.map(|t| t.title), Some("Inspect pump".into()));
    }

    #[tokio::test]
    async fn test_delete_and_clear_read() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let ctx = fx.ctx(&worker);
        let a = fx
            .notifications
            .create_and_emit(input(worker.id, "a"))
            .await
            .unwrap();
        let b = fx
            .notifications
            .create_and_emit(input(worker.id, "b"))
            .await
            .unwrap();
        let c = fx
            .notifications
            .create_and_emit(input(worker.id, "c"))
            .await
            .unwrap();

        fx.notifications.delete(&ctx, a.id).await.unwrap();
        assert_eq!(
            fx.notifications.delete(&ctx, a.id).await.unwrap_err().kind,
            ErrorKind::NotFound
        );

        assert_eq!(
            fx.notifications
                .mark_many_as_read(&ctx, &[b.id, NotificationId::new()])
                .await
                .unwrap(),
            1
        );
        assert_eq!(fx.notifications.delete_all_read(&ctx).await.unwrap(), 1);

        let left = fx.notifications.list(&ctx, &ListQuery::default()).await.unwrap();
        assert_eq!(left.items.len(), 1);
        assert_eq!(left.items[0].id, c.id);
    }
}
