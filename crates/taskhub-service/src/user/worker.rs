//! Worker accounts and self-service profiles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use taskhub_auth::password::{PasswordHasher, PasswordValidator};
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::types::UserId;
use taskhub_database::store::{TaskStore, UserStore};
use taskhub_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::auth::{create_account, user_exists};
use crate::context::RequestContext;
use crate::notification::{NotificationService, WorkerAccountChange};
use crate::validation::validate_request;

/// Request to create a worker account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkerRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "All fields are required"),
        email(message = "Invalid email address")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "All fields are required"))]
    pub password: String,
    /// Opaque reference to an already-stored image.
    pub profile_image: Option<String>,
}

/// Changes an admin may make to a worker account. Absent or blank fields
/// are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkerRequest {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub password: Option<String>,
    /// Opaque reference to an already-stored image.
    pub profile_image: Option<String>,
}

impl UpdateWorkerRequest {
    fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            name: keep(self.name),
            email: keep(self.email).map(|e| e.to_lowercase()),
            password: self.password.filter(|p| !p.trim().is_empty()),
            profile_image: keep(self.profile_image),
        }
    }
}

/// Profile changes a user may make to their own account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
}

/// Worker management for admins and profile access for everyone.
#[derive(Debug, Clone)]
pub struct WorkerService {
    users: Arc<dyn UserStore>,
    tasks: Arc<dyn TaskStore>,
    notifications: Arc<NotificationService>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
}

impl WorkerService {
    /// Creates a new worker service.
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        notifications: Arc<NotificationService>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            tasks,
            notifications,
            hasher,
            validator,
        }
    }

    /// Create a worker account. Admin only.
    pub async fn create_worker(
        &self,
        ctx: &RequestContext,
        req: CreateWorkerRequest,
    ) -> Result<User, AppError> {
        ctx.require_admin()?;
        validate_request(&req)?;
        self.validator.validate(&req.password)?;

        let worker = create_account(
            self.users.as_ref(),
            &self.hasher,
            CreateUser {
                name: req.name.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                password_hash: String::new(),
                role: UserRole::Worker,
                profile_image: req.profile_image,
            },
            &req.password,
        )
        .await?;

        info!(admin_id = %ctx.user_id, worker_id = %worker.id, "Worker created");
        Ok(worker)
    }

    /// All workers, newest first. Admin only.
    pub async fn list_workers(&self, ctx: &RequestContext) -> Result<Vec<User>, AppError> {
        ctx.require_admin()?;
        self.users.find_by_role(UserRole::Worker).await
    }

    /// A single worker. Admin only.
    pub async fn get_worker(&self, ctx: &RequestContext, id: UserId) -> Result<User, AppError> {
        ctx.require_admin()?;
        self.users
            .find_by_id(id)
            .await?
            .filter(|u| u.role == UserRole::Worker)
            .ok_or_else(worker_not_found)
    }

    /// Change a worker's name, email, password or image. Admin only.
    ///
    /// The worker is told about the change; failing to tell them does not
    /// fail the update.
    pub async fn update_worker(
        &self,
        ctx: &RequestContext,
        id: UserId,
        req: UpdateWorkerRequest,
    ) -> Result<User, AppError> {
        ctx.require_admin()?;
        let req = req.normalized();
        validate_request(&req)?;
        if let Some(password) = &req.password {
            self.validator.validate(password)?;
        }

        let worker = self.get_worker(ctx, id).await?;
        if let Some(email) = req.email.as_deref().filter(|e| *e != worker.email) {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(user_exists());
            }
        }

        let password_hash = match &req.password {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };
        let updated = self
            .users
            .update_account(id, &UpdateUser {
                name: req.name,
                email: req.email,
                password_hash,
                profile_image: req.profile_image,
            })
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Conflict => user_exists(),
                _ => e,
            })?
            .ok_or_else(worker_not_found)?;

        info!(admin_id = %ctx.user_id, worker_id = %updated.id, "Worker updated");

        let change = WorkerAccountChange {
            worker_id: updated.id,
            worker_name: updated.name.clone(),
            changed_by: ctx.user_id,
        };
        if let Err(e) = self.notifications.notify_worker_updated(&change).await {
            warn!(worker_id = %updated.id, error = %e, "Worker update notification failed");
        }
        Ok(updated)
    }

    /// Remove a worker account. Admin only.
    ///
    /// The worker's tasks become unassigned and the notifications addressed
    /// to them are dropped. Notifications they sent stay with their
    /// recipients. Every other admin is told.
    pub async fn delete_worker(&self, ctx: &RequestContext, id: UserId) -> Result<User, AppError> {
        let worker = self.get_worker(ctx, id).await?;

        let unassigned = self.tasks.unassign_all(worker.id).await?;
        self.notifications.purge_recipient(worker.id).await?;
        if !self.users.delete(worker.id).await? {
            return Err(worker_not_found());
        }

        info!(
            admin_id = %ctx.user_id,
            worker_id = %worker.id,
            unassigned,
            "Worker deleted"
        );

        let change = WorkerAccountChange {
            worker_id: worker.id,
            worker_name: worker.name.clone(),
            changed_by: ctx.user_id,
        };
        for admin in self.users.find_by_role(UserRole::Admin).await? {
            if admin.id == ctx.user_id {
                continue;
            }
            if let Err(e) = self.notifications.notify_worker_deleted(&change, admin.id).await {
                warn!(admin_id = %admin.id, error = %e, "Worker removal notification failed");
            }
        }
        Ok(worker)
    }

    /// The caller's own account.
    pub async fn profile(&self, ctx: &RequestContext) -> Result<User, AppError> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Rename the caller.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        req: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        let name = req
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::validation("name is required"))?;

        let user = self
            .users
            .update_name(ctx.user_id, &name)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

fn worker_not_found() -> AppError {
    AppError::not_found("Worker not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use taskhub_entity::notification::NotificationType;

    fn request(email: &str) -> CreateWorkerRequest {
        CreateWorkerRequest {
            name: "Wendy".into(),
            email: email.into(),
            password: "secret1".into(),
            profile_image: Some("img/wendy.png".into()),
        }
    }

    #[tokio::test]
    async fn test_admin_creates_and_lists_workers() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let ctx = fx.ctx(&admin);

        let worker = fx.workers.create_worker(&ctx, request("w@example.com")).await.unwrap();
        assert_eq!(worker.role, UserRole::Worker);
        assert_eq!(worker.profile_image.as_deref(), Some("img/wendy.png"));
        assert_ne!(worker.password_hash, "secret1");

        let listed = fx.workers.list_workers(&ctx).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(fx.workers.get_worker(&ctx, worker.id).await.unwrap().id, worker.id);

        let err = fx.workers.get_worker(&ctx, admin.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_worker_cannot_manage_workers() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let err = fx
            .workers
            .create_worker(&fx.ctx(&worker), request("x@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, "Access denied. Admin only.");
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let mut req = request("w@example.com");
        req.password = "abc".into();
        let err = fx.workers.create_worker(&fx.ctx(&admin), req).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_update_worker_changes_only_given_fields() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let ctx = fx.ctx(&admin);
        let worker = fx.workers.create_worker(&ctx, request("w@example.com")).await.unwrap();

        let updated = fx
            .workers
            .update_worker(&ctx, worker.id, UpdateWorkerRequest {
                name: Some("  ".into()),
                email: Some("Wanda@Example.com".into()),
                password: Some("newsecret".into()),
                profile_image: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Wendy");
        assert_eq!(updated.email, "wanda@example.com");
        assert_eq!(updated.profile_image.as_deref(), Some("img/wendy.png"));
        assert_ne!(updated.password_hash, worker.password_hash);

        let page = fx
            .notifications
            .list(&fx.ctx(&updated), &crate::notification::ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].notification_type, NotificationType::WorkerUpdated);
        assert_eq!(page.items[0].sender, Some(admin.id));
    }

    #[tokio::test]
    async fn test_update_worker_rejections() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let ctx = fx.ctx(&admin);
        let worker = fx.worker("w@example.com").await;
        fx.worker("taken@example.com").await;

        let err = fx
            .workers
            .update_worker(&ctx, worker.id, UpdateWorkerRequest {
                email: Some("taken@example.com".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "User already exists");

        let err = fx
            .workers
            .update_worker(&ctx, worker.id, UpdateWorkerRequest {
                email: Some("not-an-email".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid email address");

        let err = fx
            .workers
            .update_worker(&ctx, admin.id, UpdateWorkerRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = fx
            .workers
            .update_worker(&fx.ctx(&worker), worker.id, UpdateWorkerRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_delete_worker_keeps_sent_notifications() {
        let fx = Fixture::new();
        let admin = fx.admin("boss@example.com").await;
        let other_admin = fx.admin("deputy@example.com").await;
        let worker = fx.worker("w@example.com").await;
        let task = fx.task(&admin, "Fix roof", Some(worker.id)).await;

        fx.tasks
            .update_status(&fx.ctx(&worker), task.id, Some("in-progress".into()))
            .await
            .unwrap();
        fx.notifications
            .create_and_emit(crate::notification::NotificationInput {
                recipient: Some(worker.id),
                notification_type: Some(NotificationType::General),
                title: "Hi".into(),
                message: "Hello".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let removed = fx.workers.delete_worker(&fx.ctx(&admin), worker.id).await.unwrap();
        assert_eq!(removed.id, worker.id);

        assert!(fx.users.find_by_id(worker.id).await.unwrap().is_none());
        let task = fx.task_store.find_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(task.assigned_to, None);

        let list = crate::notification::ListQuery::default();
        let boss = fx.notifications.list(&fx.ctx(&admin), &list).await.unwrap();
        assert_eq!(boss.items.len(), 1);
        assert_eq!(boss.items[0].sender, Some(worker.id));

        let deputy = fx.notifications.list(&fx.ctx(&other_admin), &list).await.unwrap();
        assert_eq!(deputy.items.len(), 1);
        assert_eq!(deputy.items[0].notification_type, NotificationType::WorkerDeleted);
        assert_eq!(deputy.items[0].message, "Worker \"w\" has been removed");

        let detail = fx
            .notifications
            .get(&fx.ctx(&admin), boss.items[0].id)
            .await
            .unwrap();
        assert!(detail.sender_info.is_none());

        let err = fx
            .workers
            .delete_worker(&fx.ctx(&admin), worker.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Worker not found");
    }

    #[tokio::test]
    async fn test_profile_rename() {
        let fx = Fixture::new();
        let worker = fx.worker("w@example.com").await;
        let ctx = fx.ctx(&worker);

        let err = fx
            .workers
            .update_profile(&ctx, UpdateProfileRequest {
                name: Some(" ".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message, "name is required");

        let renamed = fx
            .workers
            .update_profile(&ctx, UpdateProfileRequest {
                name: Some("Wanda".into()),
            })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Wanda");
        assert_eq!(fx.workers.profile(&ctx).await.unwrap().name, "Wanda");
    }
}
