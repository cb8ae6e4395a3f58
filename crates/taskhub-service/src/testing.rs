//! Shared fixtures for service tests: memory stores and a publisher that
//! records what it was asked to send.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use taskhub_auth::jwt::JwtEncoder;
use taskhub_auth::password::{PasswordHasher, PasswordValidator};
use taskhub_core::config::auth::AuthConfig;
use taskhub_core::config::notification::NotificationConfig;
use taskhub_core::traits::EventPublisher;
use taskhub_core::types::UserId;
use taskhub_database::memory::{MemoryNotificationStore, MemoryTaskStore, MemoryUserStore};
use taskhub_database::store::{TaskStore, UserStore};
use taskhub_entity::task::{CreateTask, Task, TaskPriority};
use taskhub_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;
use crate::notification::NotificationService;
use crate::task::TaskService;
use crate::user::{AuthService, WorkerService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(UserId),
    Role(String),
}

/// Publisher that keeps every event instead of delivering it.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<(Target, String, Value)>>,
}

impl RecordingPublisher {
    pub fn all(&self) -> Vec<(Target, String, Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn user_events(&self, user_id: UserId) -> Vec<(String, Value)> {
        self.matching(&Target::User(user_id))
    }

    pub fn role_events(&self, role: &str) -> Vec<(String, Value)> {
        self.matching(&Target::Role(role.to_string()))
    }

    fn matching(&self, target: &Target) -> Vec<(String, Value)> {
        self.all()
            .into_iter()
            .filter(|(t, _, _)| t == target)
            .map(|(_, event, payload)| (event, payload))
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish_to_user(&self, user_id: UserId, event: &str, payload: Value) -> usize {
        self.sent
            .lock()
            .unwrap()
            .push((Target::User(user_id), event.to_string(), payload));
        1
    }

    async fn publish_to_role(&self, role: &str, event: &str, payload: Value) -> usize {
        self.sent
            .lock()
            .unwrap()
            .push((Target::Role(role.to_string()), event.to_string(), payload));
        1
    }
}

/// Every service wired over fresh memory stores.
pub struct Fixture {
    pub users: Arc<MemoryUserStore>,
    pub task_store: Arc<MemoryTaskStore>,
    pub notification_store: Arc<MemoryNotificationStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub notifications: Arc<NotificationService>,
    pub tasks: TaskService,
    pub auth: AuthService,
    pub workers: WorkerService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(true)
    }

    pub fn without_publisher() -> Self {
        Self::build(false)
    }

    fn build(with_publisher: bool) -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let task_store = Arc::new(MemoryTaskStore::new());
        let notification_store = Arc::new(MemoryNotificationStore::new());
        let publisher = Arc::new(RecordingPublisher::default());

        let mut notifications = NotificationService::new(
            notification_store.clone(),
            users.clone(),
            task_store.clone(),
            NotificationConfig::default(),
        );
        if with_publisher {
            notifications = notifications.with_publisher(publisher.clone());
        }
        let notifications = Arc::new(notifications);

        let auth_config = AuthConfig::default();
        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&auth_config));

        Self {
            tasks: TaskService::new(task_store.clone(), users.clone(), notifications.clone()),
            auth: AuthService::new(
                users.clone(),
                hasher.clone(),
                validator.clone(),
                Arc::new(JwtEncoder::new(&auth_config)),
            ),
            workers: WorkerService::new(
                users.clone(),
                task_store.clone(),
                notifications.clone(),
                hasher,
                validator,
            ),
            users,
            task_store,
            notification_store,
            publisher,
            notifications,
        }
    }

    pub async fn admin(&self, email: &str) -> User {
        self.user(email, UserRole::Admin).await
    }

    pub async fn worker(&self, email: &str) -> User {
        self.user(email, UserRole::Worker).await
    }

    async fn user(&self, email: &str, role: UserRole) -> User {
        self.users
            .create(&CreateUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password_hash: "unused".into(),
                role,
                profile_image: None,
            })
            .await
            .unwrap()
    }

    /// Insert a task directly, bypassing events and notifications.
    pub async fn task(&self, creator: &User, title: &str, assigned_to: Option<UserId>) -> Task {
        self.task_store
            .create(&CreateTask {
                title: title.to_string(),
                description: None,
                priority: TaskPriority::Medium,
                created_by: creator.id,
                assigned_to,
                attachments: Vec::new(),
            })
            .await
            .unwrap()
    }

    pub fn ctx(&self, user: &User) -> RequestContext {
        RequestContext::new(user.id, user.role, user.name.clone())
    }
}
