//! Admin signup and credential login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use taskhub_auth::jwt::JwtEncoder;
use taskhub_auth::password::{PasswordHasher, PasswordValidator};
use taskhub_core::error::{AppError, ErrorKind};
use taskhub_database::store::UserStore;
use taskhub_entity::user::{CreateUser, User, UserRole};

use crate::validation::validate_request;

/// Signup form. Every field is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
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
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required"))]
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    /// The user's role.
    pub role: UserRole,
    /// The user's display name.
    pub name: String,
}

/// Creates admin accounts and exchanges credentials for tokens.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    encoder: Arc<JwtEncoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
        }
    }

    /// Register a new admin.
    pub async fn signup(&self, req: SignupRequest) -> Result<User, AppError> {
        validate_request(&req)?;
        self.validator.validate(&req.password)?;

        let user = create_account(
            self.users.as_ref(),
            &self.hasher,
            CreateUser {
                name: req.name.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                password_hash: String::new(),
                role: UserRole::Admin,
                profile_image: None,
            },
            &req.password,
        )
        .await?;

        info!(user_id = %user.id, "Admin registered");
        Ok(user)
    }

    /// Verify credentials and issue a token.
    ///
    /// An unknown email and a wrong password fail identically.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        validate_request(&req)?;

        let Some(user) = self.users.find_by_email(req.email.trim()).await? else {
            debug!("Login attempt for unknown email");
            return Err(invalid_credentials());
        };

        if !self.hasher.verify_password(&req.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let issued = self.encoder.issue(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token: issued.token,
            role: user.role,
            name: user.name,
        })
    }
}

/// Hash `password` into `data` and insert it. An existing email is reported
/// as a validation failure.
pub(crate) async fn create_account(
    users: &dyn UserStore,
    hasher: &PasswordHasher,
    mut data: CreateUser,
    password: &str,
) -> Result<User, AppError> {
    if users.find_by_email(&data.email).await?.is_some() {
        return Err(user_exists());
    }

    data.password_hash = hasher.hash_password(password)?;
    users.create(&data).await.map_err(|e| match e.kind {
        ErrorKind::Conflict => user_exists(),
        _ => e,
    })
}

pub(crate) fn user_exists() -> AppError {
    AppError::validation("User already exists")
}

fn invalid_credentials() -> AppError {
    AppError::validation("Invalid credentials")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Boss".into(),
            email: email.into(),
            password: "secret1".into(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let fx = Fixture::new();
        let admin = fx.auth.signup(signup("Boss@Example.com")).await.unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.email, "boss@example.com");

        let session = fx
            .auth
            .login(LoginRequest {
                email: "boss@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap();
        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(session.name, "Boss");
        assert!(!session.token.is_empty());
    }

    #[tokio::test]
    async fn test_signup_rejects_missing_and_duplicate() {
        let fx = Fixture::new();
        let mut missing = signup("a@example.com");
        missing.name.clear();
        let err = fx.auth.signup(missing).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "All fields are required");

        fx.auth.signup(signup("a@example.com")).await.unwrap();
        let err = fx.auth.signup(signup("A@example.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "User already exists");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let fx = Fixture::new();
        fx.auth.signup(signup("a@example.com")).await.unwrap();

        let wrong_password = fx
            .auth
            .login(LoginRequest {
                email: "a@example.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        let unknown = fx
            .auth
            .login(LoginRequest {
                email: "ghost@example.com".into(),
                password: "secret1".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.message, "Invalid credentials");
        assert_eq!(unknown.message, wrong_password.message);
        assert_eq!(unknown.kind, ErrorKind::Validation);
    }
}
