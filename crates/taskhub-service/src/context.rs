//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_auth::SessionIdentity;
use taskhub_core::error::AppError;
use taskhub_core::types::UserId;
use taskhub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the HTTP layer from the resolved credential and passed into
/// service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's current role.
    pub role: UserRole,
    /// Display name.
    pub name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: UserRole, name: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            name: name.into(),
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Authorization` unless the current user is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Access denied. Admin only."))
        }
    }
}

impl From<SessionIdentity> for RequestContext {
    fn from(identity: SessionIdentity) -> Self {
        Self::new(identity.user_id, identity.role, identity.name)
    }
}
