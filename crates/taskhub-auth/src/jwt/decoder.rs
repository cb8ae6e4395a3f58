//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use taskhub_core::config::auth::AuthConfig;

use super::claims::Claims;
use crate::identity::AuthFailure;

/// Validates signature and expiry of presented tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes a token, checking signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthFailure> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                AuthFailure::InvalidOrExpiredCredential
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtEncoder;
    use chrono::Utc;
    use taskhub_core::types::UserId;
    use taskhub_entity::user::UserRole;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    fn claims(exp_offset_secs: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: UserId::new(),
            role: UserRole::Worker,
            name: "W".into(),
            iat: now,
            exp: now + exp_offset_secs,
        }
    }

    #[test]
    fn test_roundtrip_subject() {
        let cfg = config("s3cret");
        let original = claims(3600);
        let token = JwtEncoder::new(&cfg).encode_claims(&original).unwrap();
        let decoded = JwtDecoder::new(&cfg).decode(&token).unwrap();
        assert_eq!(decoded.sub, original.sub);
        assert_eq!(decoded.role, UserRole::Worker);
    }

    #[test]
    fn test_expired_rejected() {
        let cfg = config("s3cret");
        let token = JwtEncoder::new(&cfg).encode_claims(&claims(-3600)).unwrap();
        assert_eq!(
            JwtDecoder::new(&cfg).decode(&token).unwrap_err(),
            AuthFailure::InvalidOrExpiredCredential
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtEncoder::new(&config("one"))
            .encode_claims(&claims(3600))
            .unwrap();
        assert!(JwtDecoder::new(&config("two")).decode(&token).is_err());
        assert!(JwtDecoder::new(&config("two")).decode("garbage").is_err());
    }
}
