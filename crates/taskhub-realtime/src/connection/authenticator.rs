//! WebSocket handshake authentication.

use taskhub_auth::{IdentityResolver, SessionIdentity, bearer_token};
use taskhub_core::result::AppResult;

/// Authenticates WebSocket handshakes.
///
/// The credential comes from the `token` query parameter or the
/// `Authorization: Bearer` header; the query parameter wins when both are
/// present.
#[derive(Debug, Clone)]
pub struct WsAuthenticator {
    resolver: IdentityResolver,
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    /// Pick the credential to check from the handshake.
    pub fn credential<'a>(
        query_token: Option<&'a str>,
        authorization: Option<&'a str>,
    ) -> Option<&'a str> {
        query_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| authorization.and_then(bearer_token))
    }

    /// Resolve the handshake to a live identity.
    pub async fn authenticate(
        &self,
        query_token: Option<&str>,
        authorization: Option<&str>,
    ) -> AppResult<SessionIdentity> {
        self.resolver
            .resolve(Self::credential(query_token, authorization))
            .await
    }
}
