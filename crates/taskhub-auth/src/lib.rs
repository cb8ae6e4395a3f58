//! # taskhub-auth
//!
//! Credential handling for TaskHub.
//!
//! ## Modules
//!
//! - `jwt`: signed, expiring bearer tokens whose subject is a user id
//! - `password`: Argon2id hashing and minimum-length policy
//! - `identity`: resolving a presented credential to a live user

pub mod identity;
pub mod jwt;
pub mod password;

pub use identity::{AuthFailure, IdentityResolver, SessionIdentity, bearer_token};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
