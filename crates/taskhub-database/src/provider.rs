//! Store provider selected from configuration.

use std::sync::Arc;

use tracing::info;

use taskhub_core::config::database::DatabaseConfig;
use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryNotificationStore, MemoryTaskStore, MemoryUserStore};
use crate::repositories::{NotificationRepository, TaskRepository, UserRepository};
use crate::store::{NotificationStore, TaskStore, UserStore};

/// The three stores the service layer needs, behind their traits.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Identity store.
    pub users: Arc<dyn UserStore>,
    /// Task store.
    pub tasks: Arc<dyn TaskStore>,
    /// Notification store.
    pub notifications: Arc<dyn NotificationStore>,
    /// Pool handle when backed by PostgreSQL.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured provider.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL stores");
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            "memory" => {
                info!("Initializing in-memory stores");
                Ok(Self::memory())
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        let pg = pool.pool().clone();
        Self {
            users: Arc::new(UserRepository::new(pg.clone())),
            tasks: Arc::new(TaskRepository::new(pg.clone())),
            notifications: Arc::new(NotificationRepository::new(pg)),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-memory stores.
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryUserStore::new()),
            tasks: Arc::new(MemoryTaskStore::new()),
            notifications: Arc::new(MemoryNotificationStore::new()),
            pool: None,
        }
    }

    /// Check backend connectivity. Always healthy for in-memory stores.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
