//! Resolving a presented bearer credential to a live user.
//!
//! Shared by the HTTP extractor and the realtime handshake so both reject
//! the same credentials for the same reasons.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::UserId;
use taskhub_database::store::UserStore;
use taskhub_entity::user::{User, UserRole};

use crate::jwt::JwtDecoder;

/// Why a credential was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No credential was presented.
    #[error("No token provided")]
    MissingCredential,
    /// Bad signature, malformed token, or past expiry.
    #[error("Invalid token")]
    InvalidOrExpiredCredential,
    /// The token's subject no longer exists.
    #[error("User not found")]
    UnknownUser,
}

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::with_source(
            ErrorKind::Authentication,
            format!("Authentication error: {failure}"),
            failure,
        )
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Identity bound to a request or a realtime session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// The authenticated user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Current role, read from the identity store.
    pub role: UserRole,
}

impl SessionIdentity {
    /// Whether the identity holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Authorization` unless the identity is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Access denied. Admin only."))
        }
    }
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Verifies a token and loads its subject from the identity store.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    decoder: JwtDecoder,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    /// Creates a new resolver.
    pub fn new(decoder: JwtDecoder, users: Arc<dyn UserStore>) -> Self {
        Self { decoder, users }
    }

    /// Resolve an optional credential.
    ///
    /// Store failures surface as their own error kind, not as an
    /// authentication failure.
    pub async fn resolve(&self, credential: Option<&str>) -> AppResult<SessionIdentity> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure::MissingCredential)?;

        let claims = self.decoder.decode(token)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| {
                debug!(user_id = %claims.sub, "Token subject not found");
                AuthFailure::UnknownUser
            })?;

        Ok(SessionIdentity::from(&user))
    }
}
