//! Application state shared across all handlers via Axum's `State` extractor.

use std::sync::Arc;

use taskhub_auth::{IdentityResolver, JwtDecoder, JwtEncoder, PasswordHasher, PasswordValidator};
use taskhub_core::config::AppConfig;
use taskhub_database::Stores;
use taskhub_realtime::{ConnectionRegistry, RealtimeGateway, WsAuthenticator};
use taskhub_service::{AuthService, NotificationService, TaskService, WorkerService};

/// Shared application state.
///
/// Cloned into every handler, so every field is cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Backing stores.
    pub stores: Stores,
    /// Resolves bearer credentials to live users.
    pub identity: IdentityResolver,
    /// WebSocket handshake authentication.
    pub ws_authenticator: WsAuthenticator,
    /// Live sessions and addressed delivery.
    pub gateway: Arc<RealtimeGateway>,
    /// Signup and login.
    pub auth_service: Arc<AuthService>,
    /// Worker accounts and profiles.
    pub worker_service: Arc<WorkerService>,
    /// Task lifecycle.
    pub task_service: Arc<TaskService>,
    /// Notification creation and queries.
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire every service over the given stores.
    ///
    /// The notification service publishes through the gateway, so live
    /// sessions receive events as soon as they are persisted.
    pub fn new(config: AppConfig, stores: Stores) -> Self {
        let hasher = Arc::new(PasswordHasher::new());
        let validator = Arc::new(PasswordValidator::new(&config.auth));
        let encoder = Arc::new(JwtEncoder::new(&config.auth));
        let identity = IdentityResolver::new(JwtDecoder::new(&config.auth), stores.users.clone());

        let registry = Arc::new(ConnectionRegistry::new());
        let gateway = Arc::new(RealtimeGateway::new(config.realtime.clone(), registry));

        let notification_service = Arc::new(
            NotificationService::new(
                stores.notifications.clone(),
                stores.users.clone(),
                stores.tasks.clone(),
                config.notifications.clone(),
            )
            .with_publisher(gateway.clone()),
        );
        let task_service = Arc::new(TaskService::new(
            stores.tasks.clone(),
            stores.users.clone(),
            notification_service.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            stores.users.clone(),
            hasher.clone(),
            validator.clone(),
            encoder,
        ));
        let worker_service = Arc::new(WorkerService::new(
            stores.users.clone(),
            stores.tasks.clone(),
            notification_service.clone(),
            hasher,
            validator,
        ));

        Self {
            config: Arc::new(config),
            stores,
            ws_authenticator: WsAuthenticator::new(identity.clone()),
            identity,
            gateway,
            auth_service,
            worker_service,
            task_service,
            notification_service,
        }
    }
}
